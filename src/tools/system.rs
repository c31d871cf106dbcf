//! System information tool

use crate::registry::{
    ParameterDescriptor, ParameterType, Tool, ToolArguments, ToolDescriptor, ToolOutput,
    ToolRegistration,
};
use serde_json::{json, Value};
use std::sync::Arc;
use sysinfo::{Disks, Networks, System};
use tracing::debug;

/// Host, OS, CPU, memory, and disk report with optional network and process
/// sections
pub struct SystemInfoTool;

impl SystemInfoTool {
    /// Build the registration entry for this tool
    pub fn registration() -> ToolRegistration {
        ToolRegistration::new(Self::descriptor(), |_config| {
            Ok(Arc::new(SystemInfoTool) as Arc<dyn Tool>)
        })
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "system_info",
            "Get system information including OS, CPU, memory, and disk details.",
            vec![
                ParameterDescriptor::optional(
                    "include_network",
                    ParameterType::Boolean,
                    "Include network interface information",
                )
                .with_default(json!(true)),
                ParameterDescriptor::optional(
                    "include_processes",
                    ParameterType::Boolean,
                    "Include the top processes by CPU usage",
                )
                .with_default(json!(false)),
            ],
        )
        .with_category("system")
    }
}

fn gather(include_network: bool, include_processes: bool) -> Value {
    let mut sys = System::new_all();
    sys.refresh_all();

    let system = json!({
        "os": System::name(),
        "os_version": System::os_version(),
        "kernel_version": System::kernel_version(),
        "hostname": System::host_name(),
        "uptime_seconds": System::uptime(),
        "username": whoami::username(),
        "realname": whoami::realname(),
        "distro": whoami::distro(),
    });

    let cpu = json!({
        "physical_cores": sys.physical_core_count(),
        "total_cores": sys.cpus().len(),
        "brand": sys.cpus().first().map(|c| c.brand().to_string()),
        "usage_percent": sys.global_cpu_info().cpu_usage(),
    });

    let to_gb = |bytes: u64| (bytes as f64) / (1024.0 * 1024.0 * 1024.0);
    let memory = json!({
        "total_gb": to_gb(sys.total_memory()),
        "used_gb": to_gb(sys.used_memory()),
        "total_swap_gb": to_gb(sys.total_swap()),
    });

    let disk_list = Disks::new_with_refreshed_list();
    let mut disks = Vec::new();
    for disk in &disk_list {
        disks.push(json!({
            "name": disk.name().to_string_lossy(),
            "mount_point": disk.mount_point().to_string_lossy(),
            "filesystem": disk.file_system().to_string_lossy(),
            "total_gb": to_gb(disk.total_space()),
            "available_gb": to_gb(disk.available_space()),
        }));
    }

    let mut info = json!({
        "system": system,
        "cpu": cpu,
        "memory": memory,
        "disks": disks,
    });

    if include_network {
        let network_list = Networks::new_with_refreshed_list();
        let mut networks = Vec::new();
        for (name, data) in &network_list {
            networks.push(json!({
                "interface": name,
                "received_bytes": data.total_received(),
                "transmitted_bytes": data.total_transmitted(),
            }));
        }
        info["network"] = Value::Array(networks);
    }

    if include_processes {
        let mut processes: Vec<(f32, Value)> = sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                (
                    process.cpu_usage(),
                    json!({
                        "pid": pid.as_u32(),
                        "name": process.name(),
                        "cpu_percent": process.cpu_usage(),
                        "memory_bytes": process.memory(),
                    }),
                )
            })
            .collect();
        processes.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        let top: Vec<Value> = processes.into_iter().take(10).map(|(_, v)| v).collect();
        info["top_processes"] = Value::Array(top);
    }

    info
}

#[async_trait::async_trait]
impl Tool for SystemInfoTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        let include_network = arguments
            .get("include_network")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let include_processes = arguments
            .get("include_processes")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        debug!(
            "Gathering system info (network: {}, processes: {})",
            include_network, include_processes
        );

        // sysinfo refresh walks procfs; keep it off the async worker threads
        let report =
            tokio::task::spawn_blocking(move || gather(include_network, include_processes)).await;

        match report {
            Ok(report) => ToolOutput::json(report),
            Err(e) => ToolOutput::error(format!("Failed to gather system info: {}", e)),
        }
    }
}
