//! Sidescroll entry point
//!
//! Runs a scripted, headless session: start from the menu, run right and hop
//! every so often, and record every frame into a draw list. Pass a JSON
//! config path as the first argument to override the defaults.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sidescroll::levels::{self, Sprites};
    use sidescroll::renderer::{DrawList, SpriteAtlas};
    use sidescroll::sim::Controls;
    use sidescroll::{Config, SceneHost};

    const FRAME_MS: f64 = 16.0;
    const FRAMES: u32 = 3600;
    const REPORT_EVERY: u32 = 300;

    env_logger::init();
    log::info!("Sidescroll (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    };
    let first_scene = config.scenes.main_menu.clone();

    let mut atlas = SpriteAtlas::new();
    let sprites = Sprites::load(&mut atlas, &config);
    let mut host = SceneHost::new(config);
    levels::register_builtin(&mut host, sprites);
    if let Err(e) = host.switch_to(&first_scene) {
        log::error!("{e}");
        return;
    }

    let mut list = DrawList::new();
    let mut switches = 0;
    for frame in 0..FRAMES {
        // Hold jump for a quarter second out of every second
        let controls = Controls {
            horizontal: 1.0,
            jump: frame % 60 < 15,
        };
        if let Some(id) = host.frame_at(f64::from(frame) * FRAME_MS, controls) {
            switches += 1;
            log::info!("Frame {frame}: switched to '{id}'");
        }

        list.clear_commands();
        let stats = host.render(&mut list, &atlas);

        if frame % REPORT_EVERY == 0 {
            if let Some(scene) = host.scene() {
                let player = scene.player().map(|p| p.rect.pos);
                log::info!(
                    "Frame {frame}: camera x {:.1}, player {:?}, drawn {}, skipped {}, {} instance bytes",
                    scene.camera.pos().x,
                    player,
                    stats.drawn,
                    stats.skipped,
                    list.instance_bytes(&atlas).len()
                );
            }
        }
    }
    log::info!("Done after {FRAMES} frames and {switches} scene switches");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}
