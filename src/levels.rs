//! Built-in scenes
//!
//! A title menu and one level. Geometry is laid out on a tile grid whose
//! pitch comes from [`Config::tile_size`]; the ground sits two tiles above
//! the bottom of the window.

use crate::config::Config;
use crate::host::SceneHost;
use crate::renderer::{SpriteAtlas, SpriteId};
use crate::sim::{Avatar, Body, GameObject, Patrol, Rect, Scene, SceneTrigger, Solid, StartPrompt};

/// Level one is this many tiles wide
pub const LEVEL_WIDTH_TILES: i32 = 64;

/// Sprite handles for the built-in scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprites {
    pub menu_background: SpriteId,
    pub level_background: SpriteId,
    pub title: SpriteId,
    pub ground: SpriteId,
    pub block: SpriteId,
    pub pipe: SpriteId,
    pub player: SpriteId,
    pub enemy: SpriteId,
    pub flag: SpriteId,
}

impl Sprites {
    /// Register every built-in image in `atlas`
    pub fn load(atlas: &mut SpriteAtlas, config: &Config) -> Self {
        let tile = config.tile_size as u32;
        let (view_w, view_h) = (config.window.width, config.window.height);
        let level_w = LEVEL_WIDTH_TILES as u32 * tile;
        let sprites = Self {
            menu_background: atlas.register("menu_background", view_w, view_h),
            level_background: atlas.register("level_background", level_w, view_h),
            title: atlas.register("title", 8 * tile, 4 * tile),
            ground: atlas.register("ground", tile, tile),
            block: atlas.register("block", tile, tile),
            pipe: atlas.register("pipe", 2 * tile, 2 * tile),
            player: atlas.register("player", tile, tile),
            enemy: atlas.register("enemy", tile, tile),
            flag: atlas.register("flag", tile, 12 * tile),
        };
        log::debug!("Loaded {} sprites", atlas.len());
        sprites
    }
}

/// Register the menu and level one on `host`
pub fn register_builtin(host: &mut SceneHost, sprites: Sprites) {
    let ids = host.config().scenes.clone();
    host.register(ids.main_menu, move |config: &Config| main_menu(config, &sprites));
    host.register(ids.level_one, move |config: &Config| level_one(config, &sprites));
}

/// Title screen: pressing jump starts level one
pub fn main_menu(config: &Config, sprites: &Sprites) -> Scene {
    let tile = config.tile_size;
    let mut scene = Scene::from_config(config, 0.0).with_background(sprites.menu_background);

    let (w, h) = (8 * tile, 4 * tile);
    let x = (config.window.width as i32 - w) / 2;
    let y = (config.window.height as i32 - h) / 3;
    let title = Body::new("title", Rect::new(x as f32, y as f32, w, h))
        .with_sprite(sprites.title)
        .without_collider();
    scene.add(GameObject::new(title, StartPrompt::new(config.scenes.level_one.clone())));
    scene
}

/// Level one
///
/// Two ground segments split by a pit, a row of blocks, a pipe, three
/// walkers and a goal flag. Falling into the pit or touching a walker from
/// the side restarts the level; touching the flag returns to the menu.
pub fn level_one(config: &Config, sprites: &Sprites) -> Scene {
    let t = config.tile_size;
    let at = |col: i32, row: i32, w: i32, h: i32| Rect::new((col * t) as f32, (row * t) as f32, w * t, h * t);

    let view_h = config.window.height as i32;
    let ground_row = view_h / t - 2;
    let level_w = LEVEL_WIDTH_TILES * t;
    let max_scroll = (level_w - config.window.width as i32) as f32;

    let mut scene = Scene::from_config(config, max_scroll).with_background(sprites.level_background);
    let solid = |tag: &str, rect: Rect, sprite: SpriteId| GameObject::new(Body::new(tag, rect).with_sprite(sprite), Solid);

    // Ground, with a two-tile pit at columns 30 and 31
    scene.add(solid("ground", at(0, ground_row, 30, 2), sprites.ground));
    scene.add(solid("ground", at(32, ground_row, LEVEL_WIDTH_TILES - 32, 2), sprites.ground));

    for col in 16..20 {
        scene.add(solid("block", at(col, ground_row - 4, 1, 1), sprites.block));
    }
    scene.add(solid("pipe", at(24, ground_row - 2, 2, 2), sprites.pipe));

    let enemy_tag = config.tags.enemy.as_str();
    for col in [22, 40, 45] {
        let body = Body::new(enemy_tag, at(col, ground_row - 1, 1, 1))
            .with_sprite(sprites.enemy)
            .as_entity();
        scene.add(GameObject::new(body, Patrol::from_config(config)));
    }

    let player_tag = config.tags.player.as_str();
    let flag = Body::new("flag", at(LEVEL_WIDTH_TILES - 4, 0, 1, ground_row))
        .with_sprite(sprites.flag)
        .as_entity();
    scene.add(GameObject::new(flag, SceneTrigger::new(config.scenes.main_menu.clone(), player_tag)));

    // Invisible, below the view; never activated but still collides
    let kill_plane = Body::new("kill_plane", Rect::new(0.0, (view_h + 2 * t) as f32, level_w, t)).as_entity();
    scene.add(GameObject::new(kill_plane, SceneTrigger::new(config.scenes.level_one.clone(), player_tag)));

    // Last, so it draws on top
    let player = Body::new(player_tag, at(3, ground_row - 1, 1, 1))
        .with_sprite(sprites.player)
        .as_entity();
    scene.add(GameObject::new(player, Avatar::new(config, config.scenes.level_one.clone())));

    scene
}
