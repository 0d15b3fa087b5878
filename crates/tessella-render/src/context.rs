use std::sync::Arc;

/// A globally shared graphics context.
///
/// Wraps the wgpu instance/adapter/device/queue the bucket pipeline
/// uploads through. Returned as `Arc<Self>` so tile workers and the main
/// thread can share it cheaply.
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GraphicsContext {
    /// Creates a new graphics context.
    pub async fn new_owned() -> Arc<Self> {
        Arc::new(Self::create_context_internal().await)
    }

    /// Creates a new graphics context synchronously.
    ///
    /// This blocks the current thread until the context is created.
    pub fn new_owned_sync() -> Arc<Self> {
        pollster::block_on(Self::new_owned())
    }

    async fn create_context_internal() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find a suitable GPU adapter");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessella.Device"),
                ..Default::default()
            })
            .await
            .expect("Failed to create device");

        tracing::info!(adapter = ?adapter.get_info().name, "Created graphics context");

        Self {
            instance,
            adapter,
            device,
            queue,
        }
    }
}
