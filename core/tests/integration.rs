//! End-to-end run of every client operation against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `Remo` over real HTTP
//! with `UreqTransport`. Validates that request building, form encoding and
//! response parsing agree with an actual server.

use std::net::SocketAddr;

use remo_core::{
    AirConSettings, ApiError, InfraredSignal, NewAppliance, Remo, RemoClient, UreqTransport,
};

const DEVICE_ID: &str = mock_server::SEED_DEVICE_ID;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn remo(addr: SocketAddr, token: &str) -> Remo {
    Remo::with_transport(
        RemoClient::new(&format!("http://{addr}/1"), token),
        UreqTransport::new(),
    )
}

fn ir_signal() -> InfraredSignal {
    InfraredSignal {
        format: "us".to_string(),
        freq: 38,
        data: vec![3400, 1700, 450, 450, 450, 1300],
    }
}

#[test]
fn full_lifecycle() {
    let remo = remo(start_server(), "test-token");

    // users
    let me = remo.fetch_me().unwrap();
    assert_eq!(me.id, mock_server::SEED_USER_ID);
    let me = remo.update_me("Jane & co").unwrap();
    assert_eq!(me.nickname, "Jane & co");

    // devices
    let devices = remo.fetch_devices().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].core.id, DEVICE_ID);
    assert_eq!(devices[0].newest_events.te.as_ref().unwrap().value, 23.5);

    remo.update_device(DEVICE_ID, "Living room").unwrap();
    remo.update_temperature_offset(DEVICE_ID, -2).unwrap();
    remo.update_humidity_offset(DEVICE_ID, 3).unwrap();
    let device = &remo.fetch_devices().unwrap()[0];
    assert_eq!(device.core.name, "Living room");
    assert_eq!(device.core.temperature_offset, -2);
    assert_eq!(device.core.humidity_offset, 3);

    // air conditioner detected from a captured signal
    let candidates = remo.detect_appliance(&ir_signal()).unwrap();
    assert_eq!(candidates.len(), 1);
    let model_id = candidates[0].model.id.clone();

    let aircon = remo
        .create_appliance(&NewAppliance {
            device: DEVICE_ID.to_string(),
            nickname: "AC".to_string(),
            image: "ico_ac_1".to_string(),
            model: Some(model_id),
        })
        .unwrap();
    assert_eq!(aircon.kind, "AC");
    assert_eq!(aircon.aircon.as_ref().unwrap().temp_unit, "c");

    let settings = AirConSettings {
        temperature: Some("24".to_string()),
        operation_mode: Some("warm".to_string()),
        ..Default::default()
    };
    remo.update_aircon_settings(&aircon.id, &settings).unwrap();

    // plain infrared appliance with signals
    let light = remo
        .create_appliance(&NewAppliance {
            device: DEVICE_ID.to_string(),
            nickname: "Light".to_string(),
            image: "ico_light".to_string(),
            model: None,
        })
        .unwrap();
    assert_eq!(light.kind, "IR");
    assert!(light.settings.is_none());

    let light = remo.update_appliance(&light.id, "Ceiling light", "ico_light").unwrap();
    assert_eq!(light.nickname, "Ceiling light");

    remo.reorder_appliances(&[light.id.as_str(), aircon.id.as_str()]).unwrap();
    let appliances = remo.fetch_appliances().unwrap();
    assert_eq!(appliances[0].id, light.id);
    assert_eq!(appliances[1].id, aircon.id);
    let settings = appliances[1].settings.as_ref().unwrap();
    assert_eq!(settings.temp, "24");
    assert_eq!(settings.mode, "warm");

    let on = remo.create_appliance_signal(&light.id, &ir_signal(), "ico_on", "on").unwrap();
    let off = remo.create_appliance_signal(&light.id, &ir_signal(), "ico_off", "off").unwrap();
    remo.reorder_appliance_signals(&light.id, &[off.id.clone(), on.id.clone()]).unwrap();
    let signals = remo.fetch_appliance_signals(&light.id).unwrap();
    let names: Vec<&str> = signals.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["off", "on"]);

    remo.update_signal(&on.id, "ico_on", "power on").unwrap();
    remo.send_signal(&on.id).unwrap();
    remo.delete_signal(&off.id).unwrap();
    let signals = remo.fetch_appliance_signals(&light.id).unwrap();
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].name, "power on");

    // teardown
    remo.delete_appliance(&aircon.id).unwrap();
    remo.delete_device(DEVICE_ID).unwrap();
    assert!(remo.fetch_devices().unwrap().is_empty());
    assert!(remo.fetch_appliances().unwrap().is_empty());
}

#[test]
fn missing_resources_surface_404() {
    let remo = remo(start_server(), "test-token");

    let err = remo.send_signal("ghost").unwrap_err();
    assert_eq!(err.status(), Some(404));

    let err = remo.update_appliance("ghost", "x", "y").unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 404, .. }));

    let err = remo.fetch_appliance_signals("ghost").unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[test]
fn rejected_reorder_surfaces_400() {
    let remo = remo(start_server(), "test-token");
    let err = remo.reorder_appliances(&["not-an-appliance"]).unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[test]
fn empty_token_is_unauthorized() {
    let remo = remo(start_server(), "");
    let err = remo.fetch_me().unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let err = remo(addr, "t").fetch_me().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
