use voxelwall_wallpaper::GlesVersion;

/// Capability descriptor for an adapter.
///
/// GL adapters map to the ES level they expose: 3.1 when compute shaders are
/// available, 3.0 otherwise. Native backends cover everything up to 3.2. The
/// empty backend has no real device and reports 2.0.
pub fn gles_version_for(backend: wgpu::Backend, flags: wgpu::DownlevelFlags) -> GlesVersion {
    match backend {
        wgpu::Backend::Empty => GlesVersion::ES_2_0,
        wgpu::Backend::Gl if flags.contains(wgpu::DownlevelFlags::COMPUTE_SHADERS) => {
            GlesVersion::ES_3_1
        }
        wgpu::Backend::Gl => GlesVersion::ES_3_0,
        _ => GlesVersion::ES_3_2,
    }
}

pub fn adapter_capability(adapter: &wgpu::Adapter) -> GlesVersion {
    let info = adapter.get_info();
    let version = gles_version_for(info.backend, adapter.get_downlevel_capabilities().flags);
    tracing::debug!(backend = ?info.backend, adapter = %info.name, %version, "adapter capability");
    version
}

/// Device limits for a requested context major version. Version 3 stays within
/// what a WebGL2 / ES 3.0 class device guarantees.
pub fn limits_for(context_major_version: u32) -> wgpu::Limits {
    match context_major_version {
        0..=3 => wgpu::Limits::downlevel_webgl2_defaults(),
        _ => wgpu::Limits::downlevel_defaults(),
    }
}
