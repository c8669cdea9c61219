#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;
use rtic_monotonics::stm32::prelude::*;

mod adc;
mod power;
mod storage;
mod time;

stm32_tim2_monotonic!(Mono, 1_000_000);

#[app(device = embassy_stm32, peripherals = true, dispatchers = [USART1])]
mod app {
    use super::*;
    use core::cell::RefCell;
    use defmt::{debug, info, warn};
    use embassy_stm32::gpio::{Level, Output, Speed};
    use embassy_stm32::i2c::{self, I2c};
    use embassy_stm32::mode::Async;
    use embassy_stm32::peripherals;
    use embassy_stm32::rcc::{Hse, HseMode, LsConfig, LseConfig, LseMode};
    use embassy_stm32::spi::Spi;
    use embassy_stm32::time::Hertz;
    use embassy_stm32::Peri;
    use embassy_sync::blocking_mutex::Mutex;
    use embassy_time::Delay;
    use logger_core::{CycleController, CycleOutcome, LoggerConfig, Parts, Schedule};
    use static_cell::StaticCell;

    use crate::adc::BatteryAdc;
    use crate::power::LowPowerIdle;
    use crate::storage::{SdCardStore, SharedSpiBus};
    use crate::time::RtcClock;

    type Logger = CycleController<
        BatteryAdc,
        I2c<'static, Async>,
        Delay,
        SdCardStore,
        RtcClock,
        LowPowerIdle,
        Output<'static>,
        Output<'static>,
    >;

    struct LoggerPeripherals {
        adc: Peri<'static, peripherals::ADC1>,
        battery: Peri<'static, peripherals::PA4>,
        i2c: Peri<'static, peripherals::I2C1>,
        scl: Peri<'static, peripherals::PB6>,
        sda: Peri<'static, peripherals::PB7>,
        i2c_tx_dma: Peri<'static, peripherals::DMA1_CH6>,
        i2c_rx_dma: Peri<'static, peripherals::DMA1_CH0>,
        spi: Peri<'static, peripherals::SPI2>,
        sck: Peri<'static, peripherals::PB13>,
        mosi: Peri<'static, peripherals::PB15>,
        miso: Peri<'static, peripherals::PB14>,
        sd_cs: Peri<'static, peripherals::PC6>,
        sleep_led: Peri<'static, peripherals::PC1>,
        busy_led: Peri<'static, peripherals::PB8>,
    }

    embassy_stm32::bind_interrupts!(struct I2cIrqs {
        I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
        I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
    });

    #[shared]
    struct Shared {}

    #[local]
    struct Local {}

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        info!("Environmental logger starting...");

        // Adafruit Feather STM32F405: 12 MHz HSE, 32.768 kHz LSE (PC14/PC15)
        let mut config = embassy_stm32::Config::default();
        config.rcc.hse = Some(Hse {
            freq: Hertz(12_000_000),
            mode: HseMode::Oscillator,
        });

        // HSE (12 MHz) / PREDIV(6) = 2 MHz (PLL input)
        // 2 MHz * MUL(168) = 336 MHz (VCO)
        // VCO / DIVP(4) = 84 MHz (SYSCLK)
        // VCO / DIVQ(7) = 48 MHz (USB/SDIO clock)
        config.rcc.pll_src = embassy_stm32::rcc::PllSource::HSE;
        config.rcc.pll = Some(embassy_stm32::rcc::Pll {
            prediv: embassy_stm32::rcc::PllPreDiv::DIV6,
            mul: embassy_stm32::rcc::PllMul::MUL168,
            divp: Some(embassy_stm32::rcc::PllPDiv::DIV4),
            divq: Some(embassy_stm32::rcc::PllQDiv::DIV7),
            divr: None,
        });
        config.rcc.sys = embassy_stm32::rcc::Sysclk::PLL1_P;
        config.rcc.ahb_pre = embassy_stm32::rcc::AHBPrescaler::DIV1; // 84 MHz
        config.rcc.apb1_pre = embassy_stm32::rcc::APBPrescaler::DIV2; // 42 MHz
        config.rcc.apb2_pre = embassy_stm32::rcc::APBPrescaler::DIV1; // 84 MHz

        config.rcc.ls = LsConfig {
            rtc: embassy_stm32::rcc::RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz(32_768),
                mode: LseMode::Oscillator(embassy_stm32::rcc::LseDrive::MediumHigh),
            }),
        };

        let p = embassy_stm32::init(config);

        info!("System initialized with HSE (12MHz) and LSE (32.768kHz), SYSCLK=84MHz");

        // TIM2 on APB1: timer clock = 2*APB1 when prescaler != 1
        let timer_clock_hz = 84_000_000;
        Mono::start(timer_clock_hz);
        info!("TIM2 monotonic timer initialized at 1 MHz");

        time::init_time_system(p.RTC);

        let periph = LoggerPeripherals {
            adc: p.ADC1,
            battery: p.PA4,
            i2c: p.I2C1,
            scl: p.PB6,
            sda: p.PB7,
            i2c_tx_dma: p.DMA1_CH6,
            i2c_rx_dma: p.DMA1_CH0,
            spi: p.SPI2,
            sck: p.PB13,
            mosi: p.PB15,
            miso: p.PB14,
            sd_cs: p.PC6,
            sleep_led: p.PC1,
            busy_led: p.PB8,
        };

        logger::spawn(periph).ok();

        (Shared {}, Local {})
    }

    /// Wire the board peripherals into a cycle controller
    fn build_logger(periph: LoggerPeripherals, config: LoggerConfig) -> Logger {
        static SPI_BUS: StaticCell<SharedSpiBus> = StaticCell::new();

        let mut i2c_config = i2c::Config::default();
        i2c_config.frequency = Hertz(100_000);
        let i2c = I2c::new(
            periph.i2c,
            periph.scl,
            periph.sda,
            I2cIrqs,
            periph.i2c_tx_dma,
            periph.i2c_rx_dma,
            i2c_config,
        );

        let spi = Spi::new_blocking(
            periph.spi,
            periph.sck,
            periph.mosi,
            periph.miso,
            storage::init_spi_config(),
        );
        let bus = SPI_BUS.init(Mutex::new(RefCell::new(spi)));
        let sd_cs = Output::new(periph.sd_cs, Level::High, Speed::VeryHigh);

        let parts = Parts {
            adc: BatteryAdc::new(periph.adc, periph.battery),
            i2c,
            delay: Delay,
            store: SdCardStore::new(bus, sd_cs),
            clock: RtcClock,
            power: LowPowerIdle,
            sleep_indicator: Output::new(periph.sleep_led, Level::High, Speed::Low),
            busy_indicator: Output::new(periph.busy_led, Level::Low, Speed::Low),
        };

        CycleController::new(config, parts)
    }

    /// Measurement task - owns every logger peripheral and runs cycles
    /// on the schedule, one at a time
    #[task(priority = 1)]
    async fn logger(_cx: logger::Context, periph: LoggerPeripherals) -> ! {
        info!("Logger task started");

        let start = Mono::now();
        let config = LoggerConfig::default();
        let mut schedule = Schedule::new(&config.schedule);
        let mut controller = build_logger(periph, config);

        controller.start();

        loop {
            let elapsed_ms = (Mono::now() - start).to_millis();
            let fire = schedule.next_fire(elapsed_ms);
            if fire.skipped > 0 {
                warn!("Previous cycle overran, skipped {} tick(s)", fire.skipped);
            }

            Mono::delay_until(start + fire.at_ms.millis()).await;

            match controller.run_cycle().await {
                CycleOutcome::Logged(_) => debug!("Cycle at {} ms logged", fire.at_ms),
                outcome => debug!("Cycle at {} ms: {}", fire.at_ms, outcome),
            }
        }
    }

    /// RTIC idle task - WFI sleep between interrupts while low power is enabled
    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        info!("Idle task started");
        loop {
            power::idle_step();
        }
    }
}
