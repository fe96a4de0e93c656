use anyhow::{anyhow, Result};
use candle_core::utils::{cuda_is_available, metal_is_available};
use candle_core::Device;

/// Resolves a device name; `None` picks CUDA, then Metal, then CPU.
pub fn select_device(preference: Option<&str>) -> Result<Device> {
    let device = match preference.map(str::to_ascii_lowercase).as_deref() {
        Some("cpu") => Device::Cpu,
        Some("cuda") => Device::new_cuda(0).map_err(|e| anyhow!("Failed to initialize CUDA device: {}", e))?,
        Some("metal" | "mps") => Device::new_metal(0).map_err(|e| anyhow!("Failed to initialize Metal device: {}", e))?,
        Some(other) => return Err(anyhow!("Unknown device '{}' (expected cpu, cuda or metal)", other)),
        None if cuda_is_available() => Device::new_cuda(0)?,
        None if metal_is_available() => Device::new_metal(0)?,
        None => Device::Cpu,
    };
    tracing::info!(device = ?device, "selected inference device");
    Ok(device)
}
