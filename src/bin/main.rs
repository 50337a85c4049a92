#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use esp_radio::ble::controller::BleConnector;
use static_cell::StaticCell;
use trouble_host::prelude::*;

#[cfg(feature = "sensor-bmp280")]
use sump_beacon::hardware::BMP280Hardware;
#[cfg(not(feature = "sensor-bmp280"))]
use sump_beacon::traits::NoTemperature;
use sump_beacon::{
    Beacon, BeaconConfig, PayloadBuffer, SampleLoop, SensorPort,
    hardware::{FloatSwitch, StatusLed, SystemClock},
    radio::BleRadio,
};

// Pins:
// - Float switch 1 => GPIO12 (to GND, internal pull-up)
// - Float switch 2 => GPIO13 (to GND, internal pull-up)
// - Indicator LED  => GPIO21
// - BMP280         => I2C0, SDA GPIO8, SCL GPIO9, address 0x76
const CONFIG: BeaconConfig = BeaconConfig::DEFAULT;

const HCI_SLOTS: usize = 20;

esp_bootloader_esp_idf::esp_app_desc!();

static HOST_RESOURCES: StaticCell<HostResources<DefaultPacketPool, 1, 1>> = StaticCell::new();

#[esp_rtos::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());
    esp_alloc::heap_allocator!(size: 72 * 1024);

    esp_println::println!("=== Sump Beacon ===");

    // Initialize RTOS timer for embassy
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let float1 = FloatSwitch::new(peripherals.GPIO12);
    let float2 = FloatSwitch::new(peripherals.GPIO13);
    let led = StatusLed::new(peripherals.GPIO21);

    #[cfg(feature = "sensor-bmp280")]
    let temperature =
        match BMP280Hardware::new(peripherals.I2C0, peripherals.GPIO8, peripherals.GPIO9) {
            Ok(bmp280) => Some(bmp280),
            Err(e) => {
                esp_println::println!("[ERROR] BMP280 bus setup failed: {}", e);
                None
            }
        };
    #[cfg(not(feature = "sensor-bmp280"))]
    let temperature = NoTemperature;

    // Radio failures this early leave nothing to broadcast with
    let radio = esp_radio::init().expect("radio init failed");
    let connector = BleConnector::new(&radio, peripherals.BT, Default::default())
        .expect("BLE connector init failed");
    let controller: ExternalController<_, HCI_SLOTS> = ExternalController::new(connector);

    let resources = HOST_RESOURCES.init(HostResources::new());
    let stack =
        trouble_host::new(controller, resources).set_random_address(Address::random(CONFIG.address));
    let Host {
        peripheral,
        mut runner,
        ..
    } = stack.build();

    let beacon = Beacon::new(
        BleRadio::new(peripheral),
        PayloadBuffer::new(CONFIG.temperature_scale),
        CONFIG.local_name,
        CONFIG.adv_interval,
    );
    let mut sample_loop = SampleLoop::new(
        CONFIG,
        SensorPort::new(float1, float2, temperature),
        led,
        beacon,
        SystemClock,
        SystemClock,
    );

    match select(runner.run(), sample_loop.run()).await {
        Either::First(Ok(())) => panic!("BLE host runner exited"),
        Either::First(Err(_)) => panic!("BLE host runner failed"),
        Either::Second(Err(e)) => panic!("beacon halted: {}", e),
        Either::Second(Ok(never)) => match never {},
    }
}
