//! Device listing for the remote hardware service

use simulator::remote::{select_least_busy, DeviceInfo, HardwareClient};
use simulator::RemoteConfig;
use std::io::Write;
use tokio::io::AsyncBufRead;

use crate::console::Console;
use crate::session::SessionEnd;

pub fn render_devices(devices: &[DeviceInfo]) -> String {
    if devices.is_empty() {
        return "No devices offered by the hardware service.".to_string();
    }

    let least_busy = select_least_busy(devices).map(|device| device.name.as_str());
    let name_width = devices
        .iter()
        .map(|device| device.name.len())
        .max()
        .unwrap_or(0)
        .max("DEVICE".len());

    let mut lines = vec![format!(
        "  {:<width$}  {:<11}  {:<9}  {:>7}",
        "DEVICE",
        "STATUS",
        "KIND",
        "PENDING",
        width = name_width
    )];
    for device in devices {
        let marker = if Some(device.name.as_str()) == least_busy { "*" } else { " " };
        lines.push(format!(
            "{} {:<width$}  {:<11}  {:<9}  {:>7}",
            marker,
            device.name,
            if device.operational { "operational" } else { "offline" },
            if device.simulator { "simulator" } else { "hardware" },
            device.pending_jobs,
            width = name_width
        ));
    }
    if let Some(name) = least_busy {
        lines.push(format!("* least busy: {}", name));
    }
    lines.join("\n")
}

pub async fn run<R, W>(console: &mut Console<R, W>, remote: &RemoteConfig) -> anyhow::Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let client = HardwareClient::new(&remote.base_url, remote.token.clone(), remote.timeout)?;
    let devices = client.list_devices().await?;
    tracing::info!(count = devices.len(), base_url = %client.base_url(), "Listed hardware devices");

    console.say(format!("Devices at {}:", client.base_url()))?;
    console.say(render_devices(&devices))?;
    Ok(SessionEnd::Completed)
}
