use litex_hal::{
    config::RegisterMap,
    sim::{SimBus, SimStatus},
    InterruptControl, IrqSources, Timer,
};

fn soc(freq: u32) -> SimBus {
    SimBus::new(RegisterMap::litex(0xf000_0000), freq).unwrap()
}

fn irq(bus: &SimBus) -> InterruptControl<&SimBus, SimStatus> {
    InterruptControl::new(bus, SimStatus::new(), bus.map().irq)
}

fn timer(bus: &SimBus) -> Timer<&SimBus> {
    Timer::new(bus, bus.map().timer, bus.map().identifier)
}

#[test]
fn interrupt_enable_round_trip() {
    let bus = soc(100_000_000);
    let irq = irq(&bus);

    for b in [true, false] {
        irq.set_interrupt_enable(b);
        assert_eq!(irq.get_interrupt_enable(), b);
    }
}

#[test]
fn interrupt_mask_round_trip() {
    let bus = soc(100_000_000);
    let irq = irq(&bus);

    for m in [0, 1, 0b110, 0x8000_0001, 0x00ff_ff00, u32::MAX] {
        irq.set_interrupt_mask(m);
        assert_eq!(irq.get_interrupt_mask(), m);
    }
}

#[test]
fn unimplemented_mask_bits_are_ignored() {
    let bus = soc(100_000_000);
    bus.set_irq_sources(3);
    let irq = irq(&bus);

    irq.set_interrupt_mask(0xffff_fffd);
    assert_eq!(irq.get_interrupt_mask(), 0b101);

    irq.enable_source(IrqSources::TIMER0);
    assert_eq!(irq.get_interrupt_mask(), 0b111);
}

#[test]
fn pending_interrupts() {
    let bus = soc(100_000_000);
    let irq = irq(&bus);

    assert_eq!(irq.get_pending_interrupts(), 0);
    bus.raise((IrqSources::UART | IrqSources::ETHMAC).bits());
    assert_eq!(irq.get_pending_interrupts(), 0b101);
    assert!(irq.is_pending(IrqSources::ETHMAC));

    bus.acknowledge(IrqSources::UART.bits());
    assert_eq!(irq.get_pending_interrupts(), 0b100);
}

#[test]
fn counter_and_reload_round_trip() {
    let bus = soc(100_000_000);
    let timer = timer(&bus);

    let mut v: u32 = 1;
    for _ in 0..64 {
        timer.set_timer_counter(v);
        assert_eq!(timer.get_timer_counter(), v);

        timer.set_timer_reload(!v);
        assert_eq!(timer.get_timer_reload(), !v);

        v = v.wrapping_mul(0x9e37_79b9).rotate_left(7) ^ 0x5555;
    }
}

#[test]
fn system_frequency_bytes() {
    let bus = soc(0);
    let timer = timer(&bus);
    assert_eq!(timer.get_system_frequency(), 0);

    bus.set_frequency(0x0300_0000);
    assert_eq!(timer.get_system_frequency(), 50_331_648);
}

#[test]
fn busy_wait_one_second() {
    let bus = soc(100_000_000);
    bus.set_tick_step(1_000_000);
    let timer = timer(&bus);

    timer.busy_wait(10);

    assert_eq!(bus.ticks_loaded(), Some(100_000_000));
    assert_eq!(timer.get_timer_counter(), 0);
}

#[test]
fn busy_wait_ignores_stale_reload() {
    let bus = soc(1_000);
    bus.set_tick_step(7);
    let timer = timer(&bus);

    timer.set_timer_reload(500);
    timer.busy_wait(2);

    assert_eq!(bus.ticks_loaded(), Some(200));
    assert_eq!(timer.get_timer_reload(), 0);
}

#[test]
fn busy_wait_while_timer_auto_reloads() {
    let bus = soc(100_000_000);
    bus.set_tick_step(1_000_000);
    let timer = timer(&bus);

    timer.set_timer_reload(5_000_000);
    timer.set_timer_counter(2_000_000);
    timer.set_timer_enabled(true);
    // two polls wrap the counter through the reload value
    assert_eq!(timer.get_timer_counter(), 1_000_000);
    assert_eq!(timer.get_timer_counter(), 5_000_000);

    timer.busy_wait(3);

    assert_eq!(bus.ticks_loaded(), Some(100_000_000 / 10 * 3));
    assert_eq!(timer.get_timer_reload(), 0);
    assert_eq!(timer.get_timer_counter(), 0);
}

#[test]
fn disabling_timer_keeps_counter() {
    let bus = soc(100_000_000);
    bus.set_tick_step(1);
    let timer = timer(&bus);

    timer.set_timer_counter(1_000);
    timer.set_timer_enabled(true);
    let running = timer.get_timer_counter();
    assert_eq!(running, 999);

    timer.set_timer_enabled(false);
    assert_eq!(timer.get_timer_counter(), running);
    assert_eq!(timer.get_timer_counter(), running);
}

#[test]
fn critical_section_around_counter_update() {
    let bus = soc(100_000_000);
    let irq = irq(&bus);
    let timer = timer(&bus);

    irq.set_interrupt_enable(true);
    irq.free(|| {
        assert!(!irq.get_interrupt_enable());
        timer.set_timer_counter(0x0102_0304);
    });

    assert!(irq.get_interrupt_enable());
    assert_eq!(timer.get_timer_counter(), 0x0102_0304);
}
