//! Subcommands and their mapping onto `Remo` operations.

use anyhow::{Context, Result};
use clap::Subcommand;
use remo_core::{AirConSettings, InfraredSignal, NewAppliance, Remo, Transport};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the authenticated user
    Me,
    /// Change the user's nickname
    UpdateMe { nickname: String },
    /// List devices with their latest sensor readings
    Devices,
    /// Rename a device
    UpdateDevice { device: String, name: String },
    /// Delete a device
    DeleteDevice { device: String },
    /// Set a device's temperature offset
    TemperatureOffset {
        device: String,
        #[arg(allow_negative_numbers = true)]
        offset: i32,
    },
    /// Set a device's humidity offset
    HumidityOffset {
        device: String,
        #[arg(allow_negative_numbers = true)]
        offset: i32,
    },
    /// Find air conditioner models matching a captured signal
    DetectAppliance {
        /// Infrared message as JSON: {"format":"us","freq":38,"data":[...]}
        #[arg(value_name = "JSON")]
        message: String,
    },
    /// List appliances
    Appliances,
    /// Register a new appliance on a device
    CreateAppliance {
        device: String,
        nickname: String,
        image: String,
        /// Air conditioner model id from detect-appliance
        #[arg(long)]
        model: Option<String>,
    },
    /// Rename an appliance or change its icon
    UpdateAppliance {
        appliance: String,
        nickname: String,
        image: String,
    },
    /// Delete an appliance and its signals
    DeleteAppliance { appliance: String },
    /// Set the display order of all appliances
    ReorderAppliances {
        #[arg(required = true, value_delimiter = ',')]
        appliances: Vec<String>,
    },
    /// Change air conditioner settings; omitted options stay unchanged
    AirconSettings {
        appliance: String,
        #[arg(long)]
        temperature: Option<String>,
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        volume: Option<String>,
        #[arg(long)]
        direction: Option<String>,
        #[arg(long)]
        button: Option<String>,
    },
    /// List the signals of an appliance
    Signals { appliance: String },
    /// Store a new signal on an appliance
    CreateSignal {
        appliance: String,
        #[arg(value_name = "JSON")]
        message: String,
        image: String,
        name: String,
    },
    /// Set the display order of an appliance's signals
    ReorderSignals {
        appliance: String,
        #[arg(required = true, value_delimiter = ',')]
        signals: Vec<String>,
    },
    /// Rename a signal or change its icon
    UpdateSignal {
        signal: String,
        image: String,
        name: String,
    },
    /// Delete a signal
    DeleteSignal { signal: String },
    /// Emit a stored signal
    SendSignal { signal: String },
}

fn parse_message(raw: &str) -> Result<InfraredSignal> {
    serde_json::from_str(raw).context("infrared message must be JSON with format, freq and data")
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Run one command; the result is printed as JSON by the caller.
pub fn run<T: Transport>(remo: &Remo<T>, command: Command) -> Result<Value> {
    match command {
        Command::Me => to_json(remo.fetch_me()?),
        Command::UpdateMe { nickname } => to_json(remo.update_me(&nickname)?),
        Command::Devices => to_json(remo.fetch_devices()?),
        Command::UpdateDevice { device, name } => to_json(remo.update_device(&device, &name)?),
        Command::DeleteDevice { device } => to_json(remo.delete_device(&device)?),
        Command::TemperatureOffset { device, offset } => {
            to_json(remo.update_temperature_offset(&device, offset)?)
        }
        Command::HumidityOffset { device, offset } => {
            to_json(remo.update_humidity_offset(&device, offset)?)
        }
        Command::DetectAppliance { message } => {
            to_json(remo.detect_appliance(&parse_message(&message)?)?)
        }
        Command::Appliances => to_json(remo.fetch_appliances()?),
        Command::CreateAppliance {
            device,
            nickname,
            image,
            model,
        } => to_json(remo.create_appliance(&NewAppliance {
            device,
            nickname,
            image,
            model,
        })?),
        Command::UpdateAppliance {
            appliance,
            nickname,
            image,
        } => to_json(remo.update_appliance(&appliance, &nickname, &image)?),
        Command::DeleteAppliance { appliance } => to_json(remo.delete_appliance(&appliance)?),
        Command::ReorderAppliances { appliances } => to_json(remo.reorder_appliances(&appliances)?),
        Command::AirconSettings {
            appliance,
            temperature,
            mode,
            volume,
            direction,
            button,
        } => {
            let settings = AirConSettings {
                temperature,
                operation_mode: mode,
                air_volume: volume,
                air_direction: direction,
                button,
            };
            to_json(remo.update_aircon_settings(&appliance, &settings)?)
        }
        Command::Signals { appliance } => to_json(remo.fetch_appliance_signals(&appliance)?),
        Command::CreateSignal {
            appliance,
            message,
            image,
            name,
        } => {
            let message = parse_message(&message)?;
            to_json(remo.create_appliance_signal(&appliance, &message, &image, &name)?)
        }
        Command::ReorderSignals { appliance, signals } => {
            to_json(remo.reorder_appliance_signals(&appliance, &signals)?)
        }
        Command::UpdateSignal {
            signal,
            image,
            name,
        } => to_json(remo.update_signal(&signal, &image, &name)?),
        Command::DeleteSignal { signal } => to_json(remo.delete_signal(&signal)?),
        Command::SendSignal { signal } => to_json(remo.send_signal(&signal)?),
    }
}
