use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SEED_USER_ID: &str = "00000000-0000-0000-0000-00000000a5e7";
pub const SEED_DEVICE_ID: &str = "00000000-0000-0000-0000-00000000de71";
pub const AIRCON_MODEL_ID: &str = "00000000-0000-0000-0000-0000000000ac";

const TIMESTAMP: &str = "2024-01-01T00:00:00Z";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nickname: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceCore {
    pub id: String,
    pub name: String,
    pub temperature_offset: i32,
    pub humidity_offset: i32,
    pub created_at: String,
    pub updated_at: String,
    pub firmware_version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SensorValue {
    pub value: f64,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Device {
    #[serde(flatten)]
    pub core: DeviceCore,
    pub newest_events: HashMap<String, SensorValue>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApplianceModel {
    pub id: String,
    pub manufacturer: String,
    pub remote_name: String,
    pub name: String,
    pub image: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AirConParams {
    pub temp: String,
    pub vol: String,
    pub dir: String,
    pub mode: String,
    pub button: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub name: String,
    pub image: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Appliance {
    pub id: String,
    pub device: DeviceCore,
    pub model: Option<ApplianceModel>,
    pub nickname: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub settings: Option<AirConParams>,
    pub aircon: Option<Value>,
    pub signals: Vec<Signal>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfraredSignal {
    pub format: String,
    pub freq: u32,
    pub data: Vec<u32>,
}

#[derive(Deserialize)]
pub struct NicknameForm {
    pub nickname: String,
}

#[derive(Deserialize)]
pub struct NameForm {
    pub name: String,
}

#[derive(Deserialize)]
pub struct OffsetForm {
    pub offset: i32,
}

#[derive(Deserialize)]
pub struct MessageForm {
    pub message: String,
}

#[derive(Deserialize)]
pub struct CreateApplianceForm {
    pub device: String,
    pub nickname: String,
    pub image: String,
    pub model: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateApplianceForm {
    pub nickname: String,
    pub image: String,
}

#[derive(Deserialize)]
pub struct ApplianceOrderForm {
    pub appliances: String,
}

#[derive(Deserialize)]
pub struct SignalOrderForm {
    pub signals: String,
}

#[derive(Deserialize)]
pub struct AirConSettingsForm {
    pub temperature: Option<String>,
    pub operation_mode: Option<String>,
    pub air_volume: Option<String>,
    pub air_direction: Option<String>,
    pub button: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateSignalForm {
    pub message: String,
    pub image: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateSignalForm {
    pub image: String,
    pub name: String,
}

/// In-memory state of one account.
#[derive(Debug)]
pub struct Store {
    pub user: User,
    pub devices: Vec<Device>,
    pub appliances: Vec<Appliance>,
    /// Raw waveforms, keyed by signal id.
    pub messages: HashMap<String, InfraredSignal>,
    /// Ids of signals sent through `/signals/{id}/send`, oldest first.
    pub sent: Vec<String>,
}

impl Store {
    pub fn seeded() -> Self {
        let core = DeviceCore {
            id: SEED_DEVICE_ID.to_string(),
            name: "Remo".to_string(),
            temperature_offset: 0,
            humidity_offset: 0,
            created_at: TIMESTAMP.to_string(),
            updated_at: TIMESTAMP.to_string(),
            firmware_version: "Remo/1.0.77-g808448c".to_string(),
        };
        let reading = |value| SensorValue {
            value,
            created_at: TIMESTAMP.to_string(),
        };
        let newest_events = HashMap::from([
            ("te".to_string(), reading(23.5)),
            ("hu".to_string(), reading(45.0)),
        ]);
        Self {
            user: User {
                id: SEED_USER_ID.to_string(),
                nickname: "remo-user".to_string(),
            },
            devices: vec![Device { core, newest_events }],
            appliances: Vec::new(),
            messages: HashMap::new(),
            sent: Vec::new(),
        }
    }

    fn device_mut(&mut self, id: &str) -> Result<&mut Device, StatusCode> {
        self.devices
            .iter_mut()
            .find(|d| d.core.id == id)
            .ok_or(StatusCode::NOT_FOUND)
    }

    fn appliance_mut(&mut self, id: &str) -> Result<&mut Appliance, StatusCode> {
        self.appliances
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StatusCode::NOT_FOUND)
    }

    fn signal_mut(&mut self, id: &str) -> Result<&mut Signal, StatusCode> {
        self.appliances
            .iter_mut()
            .flat_map(|a| a.signals.iter_mut())
            .find(|s| s.id == id)
            .ok_or(StatusCode::NOT_FOUND)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_store(Arc::new(RwLock::new(Store::seeded())))
}

/// Router over a caller-owned store, so tests can inspect side effects.
pub fn app_with_store(db: Db) -> Router {
    Router::new()
        .route("/1/users/me", get(fetch_me).post(update_me))
        .route("/1/devices", get(fetch_devices))
        .route("/1/devices/{id}", post(update_device))
        .route("/1/devices/{id}/delete", post(delete_device))
        .route("/1/devices/{id}/temperature_offset", post(update_temperature_offset))
        .route("/1/devices/{id}/humidity_offset", post(update_humidity_offset))
        .route("/1/detectappliance", post(detect_appliance))
        .route("/1/appliances", get(fetch_appliances).post(create_appliance))
        .route("/1/appliances/{id}", post(update_appliance))
        .route("/1/appliances/{id}/delete", post(delete_appliance))
        .route("/1/appliance_orders", post(reorder_appliances))
        .route("/1/appliances/{id}/aircon_settings", post(update_aircon_settings))
        .route(
            "/1/appliances/{id}/signals",
            get(fetch_appliance_signals).post(create_appliance_signal),
        )
        .route("/1/appliances/{id}/signal_orders", post(reorder_appliance_signals))
        .route("/1/signals/{id}", post(update_signal))
        .route("/1/signals/{id}/delete", post(delete_signal))
        .route("/1/signals/{id}/send", post(send_signal))
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Result<Response, StatusCode> {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        tracing::debug!(uri = %request.uri(), "rejecting request without bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

fn empty() -> Json<Value> {
    Json(json!({}))
}

fn parse_message(raw: &str) -> Result<InfraredSignal, StatusCode> {
    serde_json::from_str(raw).map_err(|_| StatusCode::BAD_REQUEST)
}

/// Split a comma-joined id list; it must name exactly the ids in `current`.
fn parse_order(raw: &str, current: &[String]) -> Result<Vec<String>, StatusCode> {
    let order: Vec<String> = raw
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let mut wanted = order.clone();
    let mut have = current.to_vec();
    wanted.sort();
    have.sort();
    if wanted != have {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(order)
}

fn default_params() -> AirConParams {
    AirConParams {
        temp: "26".to_string(),
        vol: "auto".to_string(),
        dir: "auto".to_string(),
        mode: "cool".to_string(),
        button: String::new(),
    }
}

fn aircon_model() -> ApplianceModel {
    ApplianceModel {
        id: AIRCON_MODEL_ID.to_string(),
        manufacturer: "mock".to_string(),
        remote_name: "mock-ac-001".to_string(),
        name: "Mock AC".to_string(),
        image: "ico_ac_1".to_string(),
    }
}

fn aircon_range() -> Value {
    let mode = json!({"temp": "16-30", "vol": "auto", "dir": "auto"});
    json!({
        "range": {
            "modes": {"cool": mode, "warm": mode, "dry": mode, "blow": mode, "auto": mode},
            "fixedButtons": ["power-off"]
        },
        "tempUnit": "c"
    })
}

// --- users ---

async fn fetch_me(State(db): State<Db>) -> Json<User> {
    Json(db.read().await.user.clone())
}

async fn update_me(State(db): State<Db>, Form(input): Form<NicknameForm>) -> Json<User> {
    let mut store = db.write().await;
    store.user.nickname = input.nickname;
    Json(store.user.clone())
}

// --- devices ---

async fn fetch_devices(State(db): State<Db>) -> Json<Vec<Device>> {
    Json(db.read().await.devices.clone())
}

async fn update_device(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(input): Form<NameForm>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    store.device_mut(&id)?.core.name = input.name;
    Ok(empty())
}

async fn delete_device(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let before = store.devices.len();
    store.devices.retain(|d| d.core.id != id);
    if store.devices.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    let (removed, kept): (Vec<Appliance>, Vec<Appliance>) = std::mem::take(&mut store.appliances)
        .into_iter()
        .partition(|a| a.device.id == id);
    store.appliances = kept;
    for appliance in removed {
        for signal in appliance.signals {
            store.messages.remove(&signal.id);
        }
    }
    Ok(empty())
}

async fn update_temperature_offset(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(input): Form<OffsetForm>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    store.device_mut(&id)?.core.temperature_offset = input.offset;
    Ok(empty())
}

async fn update_humidity_offset(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(input): Form<OffsetForm>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    store.device_mut(&id)?.core.humidity_offset = input.offset;
    Ok(empty())
}

// --- appliances ---

async fn detect_appliance(Form(input): Form<MessageForm>) -> Result<Json<Value>, StatusCode> {
    let signal = parse_message(&input.message)?;
    tracing::debug!(format = %signal.format, freq = signal.freq, "detecting appliance");
    Ok(Json(json!([{ "model": aircon_model(), "params": default_params() }])))
}

async fn fetch_appliances(State(db): State<Db>) -> Json<Vec<Appliance>> {
    Json(db.read().await.appliances.clone())
}

async fn create_appliance(
    State(db): State<Db>,
    Form(input): Form<CreateApplianceForm>,
) -> Result<Json<Appliance>, StatusCode> {
    let mut store = db.write().await;
    let device = store
        .devices
        .iter()
        .find(|d| d.core.id == input.device)
        .map(|d| d.core.clone())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let (kind, model, settings, aircon) = match input.model.as_deref() {
        None | Some("") => ("IR", None, None, None),
        Some(AIRCON_MODEL_ID) => (
            "AC",
            Some(aircon_model()),
            Some(default_params()),
            Some(aircon_range()),
        ),
        Some(_) => return Err(StatusCode::BAD_REQUEST),
    };
    let appliance = Appliance {
        id: Uuid::new_v4().to_string(),
        device,
        model,
        nickname: input.nickname,
        image: input.image,
        kind: kind.to_string(),
        settings,
        aircon,
        signals: Vec::new(),
    };
    store.appliances.push(appliance.clone());
    Ok(Json(appliance))
}

async fn update_appliance(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(input): Form<UpdateApplianceForm>,
) -> Result<Json<Appliance>, StatusCode> {
    let mut store = db.write().await;
    let appliance = store.appliance_mut(&id)?;
    appliance.nickname = input.nickname;
    appliance.image = input.image;
    Ok(Json(appliance.clone()))
}

async fn delete_appliance(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let index = store
        .appliances
        .iter()
        .position(|a| a.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let removed = store.appliances.remove(index);
    for signal in removed.signals {
        store.messages.remove(&signal.id);
    }
    Ok(empty())
}

async fn reorder_appliances(
    State(db): State<Db>,
    Form(input): Form<ApplianceOrderForm>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let current: Vec<String> = store.appliances.iter().map(|a| a.id.clone()).collect();
    let order = parse_order(&input.appliances, &current)?;
    let mut appliances = std::mem::take(&mut store.appliances);
    appliances.sort_by_key(|a| order.iter().position(|id| *id == a.id));
    store.appliances = appliances;
    Ok(empty())
}

async fn update_aircon_settings(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(input): Form<AirConSettingsForm>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let appliance = store.appliance_mut(&id)?;
    let settings = appliance.settings.as_mut().ok_or(StatusCode::BAD_REQUEST)?;
    if let Some(temp) = input.temperature {
        settings.temp = temp;
    }
    if let Some(mode) = input.operation_mode {
        settings.mode = mode;
    }
    if let Some(vol) = input.air_volume {
        settings.vol = vol;
    }
    if let Some(dir) = input.air_direction {
        settings.dir = dir;
    }
    settings.button = input.button.unwrap_or_default();
    Ok(empty())
}

async fn fetch_appliance_signals(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Signal>>, StatusCode> {
    let mut store = db.write().await;
    Ok(Json(store.appliance_mut(&id)?.signals.clone()))
}

async fn create_appliance_signal(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(input): Form<CreateSignalForm>,
) -> Result<Json<Signal>, StatusCode> {
    let message = parse_message(&input.message)?;
    let mut store = db.write().await;
    let signal = Signal {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        image: input.image,
    };
    store.appliance_mut(&id)?.signals.push(signal.clone());
    store.messages.insert(signal.id.clone(), message);
    Ok(Json(signal))
}

async fn reorder_appliance_signals(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(input): Form<SignalOrderForm>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let appliance = store.appliance_mut(&id)?;
    let current: Vec<String> = appliance.signals.iter().map(|s| s.id.clone()).collect();
    let order = parse_order(&input.signals, &current)?;
    appliance
        .signals
        .sort_by_key(|s| order.iter().position(|id| *id == s.id));
    Ok(empty())
}

// --- signals ---

async fn update_signal(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(input): Form<UpdateSignalForm>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let signal = store.signal_mut(&id)?;
    signal.image = input.image;
    signal.name = input.name;
    Ok(empty())
}

async fn delete_signal(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    store.signal_mut(&id)?;
    for appliance in &mut store.appliances {
        appliance.signals.retain(|s| s.id != id);
    }
    store.messages.remove(&id);
    Ok(empty())
}

async fn send_signal(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    store.signal_mut(&id)?;
    tracing::info!(signal = %id, "sending infrared signal");
    store.sent.push(id);
    Ok(empty())
}
