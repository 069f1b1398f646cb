//! navHUD Display Firmware
//!
//! Firmware for the navHUD handlebar display (STM32F072RB, SSD1306 OLED).
//! A BLE coprocessor on USART2 forwards the phone's characteristic writes;
//! this firmware reassembles them into navigation messages and draws them.

#![no_std]
#![no_main]

mod channels;
mod ssd1306;
mod tasks;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::i2c::{self, I2c, Master};
use embassy_stm32::mode::Blocking;
use embassy_stm32::peripherals::USART2;
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, Uart};
use embassy_time::Duration;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use navhud_core::{parse_config, HudConfig};
use navhud_display::NavScreen;

use crate::ssd1306::Ssd1306;

/// Embedded configuration (compiled into firmware)
/// Edit navhud.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../navhud.toml");

/// UART receive ring buffer; holds bridge traffic while the display flushes
const UART_RX_BUF_SIZE: usize = 512;

/// Panel driver type owned by the display task
pub type Display = Ssd1306<I2c<'static, Blocking, Master>>;

bind_interrupts!(struct Irqs {
    USART2 => usart::InterruptHandler<USART2>;
});

// Static cells (must live forever for task references)
static CONFIG: StaticCell<HudConfig> = StaticCell::new();
static RX_BUF: StaticCell<[u8; UART_RX_BUF_SIZE]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("navHUD firmware starting...");

    let p = embassy_stm32::init(Default::default());

    let config: &'static HudConfig = CONFIG.init(load_config());

    // Setup I2C for OLED (PB6=SCL, PB7=SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = Hertz::khz(400);
    i2c_config.timeout = Duration::from_millis(100);

    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c_config);

    // Initialize OLED display
    let mut display = Ssd1306::new(i2c, config.display.i2c_address);
    match display.init(config.display.contrast) {
        Ok(()) => info!("OLED initialized at 0x{:02x}", config.display.i2c_address),
        Err(e) => error!("Failed to initialize display: {:?}", e),
    }

    // Setup UART for the BLE bridge (PA2=TX, PA3=RX)
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = 115200;

    let uart = match Uart::new(
        p.USART2,
        p.PA3, // RX
        p.PA2, // TX
        Irqs,
        p.DMA1_CH4,
        p.DMA1_CH5,
        uart_config,
    ) {
        Ok(uart) => uart,
        Err(e) => defmt::panic!("UART config rejected: {:?}", e),
    };

    let (tx, rx) = uart.split();
    let rx = rx.into_ring_buffered(RX_BUF.init([0; UART_RX_BUF_SIZE]));

    let screen = NavScreen::new(config.display.power_off_on_disconnect);

    // Spawn tasks
    spawner.spawn(tasks::bridge_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::bridge_tx_task(tx, config.link.device_name.as_str()))
        .unwrap();
    spawner.spawn(tasks::session_task(config)).unwrap();
    spawner.spawn(tasks::display_task(display, screen)).unwrap();

    info!("All tasks spawned");
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> HudConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration: {:?}", config);
            config
        }
        Err(e) => {
            // build.rs rejects a bad file, so this only happens if the two
            // readers disagree
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            HudConfig::default()
        }
    }
}
