//! Which backends this build can run, and which one `Auto` picks.

use super::Backend;

/// One detected backend.
#[derive(Debug, Clone)]
pub struct BackendInfo {
    /// Variant to pass to `create_backend`.
    pub backend: Backend,
    /// Display name.
    pub name: &'static str,
    /// Usable on this machine.
    pub available: bool,
    /// Auto-selection rank; the highest available wins.
    pub priority: u32,
    /// One-line summary.
    pub description: &'static str,
}

/// Detect all compiled-in backends, highest priority first.
pub fn detect_backends() -> Vec<BackendInfo> {
    #[allow(unused_mut)]
    let mut backends = vec![BackendInfo {
        backend: Backend::Cpu,
        name: "CPU",
        available: true,
        priority: 10,
        description: "rayon worker pool, one task per pixel chunk",
    }];

    #[cfg(feature = "wgpu")]
    {
        let adapter = super::WgpuBackend::is_available();
        backends.push(BackendInfo {
            backend: Backend::Wgpu,
            name: "wgpu",
            available: adapter,
            priority: if adapter { 100 } else { 0 },
            description: "compute shaders on Vulkan, Metal or DX12",
        });
    }

    backends.sort_by_key(|info| std::cmp::Reverse(info.priority));
    backends
}

/// Highest-ranked available backend. CPU if nothing else works.
pub fn select_best_backend() -> Backend {
    detect_backends()
        .into_iter()
        .filter(|b| b.available)
        .max_by_key(|b| b.priority)
        .map(|b| b.backend)
        .unwrap_or(Backend::Cpu)
}

/// One line per backend: `[+] name: description` or `[-] ...`.
pub fn describe_backends() -> String {
    detect_backends()
        .iter()
        .map(|info| {
            let mark = if info.available { '+' } else { '-' };
            format!("[{mark}] {}: {}\n", info.name, info.description)
        })
        .collect()
}
