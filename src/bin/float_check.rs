//! Wiring check for the float switches.
//!
//! Prints every level change on the two float inputs, so the switches can be
//! lifted by hand and the polarity confirmed before sealing the pit.
//!
//! Following pins are used:
//! - Float switch 1 => GPIO12
//! - Float switch 2 => GPIO13

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::{
    gpio::{Input, InputConfig, Pull},
    timer::timg::TimerGroup,
};

esp_bootloader_esp_idf::esp_app_desc!();

const SETTLE_MS: u64 = 50;

#[embassy_executor::task(pool_size = 2)]
async fn float_watcher(mut float: Input<'static>, tag: &'static str) {
    let mut level = float.is_high();
    esp_println::println!("[FLOAT {}] initial level: {}", tag, if level { "high" } else { "low" });

    loop {
        float.wait_for_any_edge().await;

        // Floats bob on the surface; let the contact settle
        Timer::after(Duration::from_millis(SETTLE_MS)).await;

        let now = float.is_high();
        if now != level {
            level = now;
            esp_println::println!("[FLOAT {}] level: {}", tag, if level { "high" } else { "low" });
        }
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let config = InputConfig::default().with_pull(Pull::Up);

    let float1 = Input::new(peripherals.GPIO12, config);
    let float2 = Input::new(peripherals.GPIO13, config);

    if let Err(e) = spawner.spawn(float_watcher(float1, "1")) {
        esp_println::println!("[ERROR] Failed to spawn watcher: {:?}", e);
    }
    if let Err(e) = spawner.spawn(float_watcher(float2, "2")) {
        esp_println::println!("[ERROR] Failed to spawn watcher: {:?}", e);
    }

    loop {
        Timer::after(Duration::from_secs(10)).await;
        esp_println::println!("[FLOAT] watching...");
    }
}
