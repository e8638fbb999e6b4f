// filepath: src/main.rs

mod app;
mod pointer;
mod wayland;

use app::AppData;
use calloop::EventLoop;
use calloop_wayland_source::WaylandSource;
use log::{info, warn};
use simple_canvas::{
    resources::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
    text, CanvasConfig, Resources, Sequencer,
};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::wlr_layer::{Layer, LayerShell},
    shm::{slot::SlotPool, Shm},
};
use wayland_client::{globals::registry_queue_init, Connection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting simple-canvas");

    let config = CanvasConfig::load_from_file().unwrap_or_else(|e| {
        warn!("Failed to load configuration, using defaults: {e}");
        CanvasConfig::default()
    });
    info!("Configuration loaded");

    let resources = Resources::resolve(&config);
    let typeface = text::load_typeface(config.text.font_path.as_deref());
    let sequencer = Sequencer::new(resources, typeface);

    let width = config.window.width.unwrap_or(DEFAULT_WIDTH);
    let height = config.window.height.unwrap_or(DEFAULT_HEIGHT);

    let conn = Connection::connect_to_env()?;
    let (globals, mut event_queue) = registry_queue_init(&conn)?;
    let qh = event_queue.handle();

    let compositor = CompositorState::bind(&globals, &qh)?;
    let layer_shell = LayerShell::bind(&globals, &qh)?;
    let shm = Shm::bind(&globals, &qh)?;
    let seat_state = SeatState::new(&globals, &qh);

    let pool_size = app::buffer_len(width, height);
    let pool = SlotPool::new(pool_size, &shm)?;

    let surface = compositor.create_surface(&qh);
    let layer_surface =
        layer_shell.create_layer_surface(&qh, surface, Layer::Top, Some("simple-canvas"), None);

    let mut app_data = AppData::new(
        RegistryState::new(&globals),
        OutputState::new(&globals, &qh),
        seat_state,
        compositor,
        shm,
        layer_surface,
        pool,
        &config,
        sequencer,
        (width, height),
    );

    info!("Performing initial round-trip");
    event_queue.roundtrip(&mut app_data)?;

    let mut event_loop: EventLoop<AppData> = EventLoop::try_new()?;
    WaylandSource::new(conn, event_queue)
        .insert(event_loop.handle())
        .map_err(|e| e.error)?;

    info!("Entering event loop, tap the canvas to draw");
    while !app_data.should_exit() {
        event_loop.dispatch(None, &mut app_data)?;
    }

    info!("Canvas closed, exiting");
    Ok(())
}
