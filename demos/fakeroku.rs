use fakeroku::{DeviceConfig, LogBridge};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => DeviceConfig::load(&path).unwrap_or_else(|e| {
            eprintln!("failed to load config {}: {}", path, e);
            process::exit(1);
        }),
        None => DeviceConfig {
            bind_address: "127.0.0.1".to_string(),
            http_port: 8060,
            multicast_group: fakeroku::config::DEFAULT_MULTICAST_GROUP.to_string(),
            uuid: "29780022-5803-1028-8092-2cd97406a5ec".to_string(),
            description_xml: None,
            device_info_xml: None,
            apps_xml: None,
        },
    };

    let (tx, rx) = mpsc::channel::<fakeroku::ControlCommand>();
    let mut handle = fakeroku::start(config, Arc::new(tx), LogBridge::new()).unwrap_or_else(|e| {
        eprintln!("failed to start device: {}", e);
        process::exit(1);
    });

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })
    .expect("failed to install signal handler");

    log::info!("emulated device running, press Ctrl-C to stop");

    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(command) => log::info!("command: {} {}", command.kind, command.payload),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    handle.stop();
    log::info!("device stopped");
}
