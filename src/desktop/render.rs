/// Rectangle rendering of a running level
///
/// Everything is drawn as filled rectangles: tiles, the player, the key.
/// World coordinates have y pointing up, so every rectangle is flipped into
/// screen space by [`Viewport::to_screen`].
///
/// # Usage Example
///
/// ```ignore
/// let viewport = Viewport::new(&config.window, session.camera());
/// render_session(&mut canvas, &viewport, session)?;
/// ```
use problematic::camera::Camera;
use problematic::collision::Aabb;
use problematic::config::WindowConfig;
use problematic::entity::{EntityKind, EntitySnapshot, Facing};
use problematic::map::COLLISION_LAYER;
use problematic::progression::LevelSelectEntry;
use problematic::session::LevelSession;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

const SKY: Color = Color::RGB(120, 180, 230);
const SOLID_TILE: Color = Color::RGB(90, 70, 50);
const QUARTER_TILE: Color = Color::RGB(140, 110, 70);
const PLAYER: Color = Color::RGB(200, 200, 210);
const PLAYER_FACE: Color = Color::RGB(40, 40, 50);
const KEY: Color = Color::RGB(240, 200, 40);

/// Maps world units onto the window, centred on the camera
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    width: u32,
    height: u32,
    pixels_per_unit: f32,
    /// World position of the bottom-left window corner
    origin_x: f32,
    origin_y: f32,
}

impl Viewport {
    pub fn new(window: &WindowConfig, camera: Camera) -> Self {
        let half_w = window.width as f32 / window.pixels_per_unit / 2.0;
        let half_h = window.height as f32 / window.pixels_per_unit / 2.0;
        Viewport {
            width: window.width,
            height: window.height,
            pixels_per_unit: window.pixels_per_unit,
            origin_x: camera.x - half_w,
            origin_y: camera.y - half_h,
        }
    }

    /// Visible world area
    pub fn world_bounds(&self) -> Aabb {
        Aabb::new(
            self.origin_x,
            self.origin_y,
            self.width as f32 / self.pixels_per_unit,
            self.height as f32 / self.pixels_per_unit,
        )
    }

    pub fn to_screen(&self, area: &Aabb) -> Rect {
        let ppu = self.pixels_per_unit;
        let left = ((area.left() - self.origin_x) * ppu).round() as i32;
        let top = self.height as i32 - ((area.top() - self.origin_y) * ppu).round() as i32;
        let w = (area.width() * ppu).round().max(1.0) as u32;
        let h = (area.height() * ppu).round().max(1.0) as u32;
        Rect::new(left, top, w, h)
    }
}

pub fn render_session(
    canvas: &mut Canvas<Window>,
    viewport: &Viewport,
    session: &LevelSession,
) -> Result<(), String> {
    canvas.set_draw_color(SKY);
    canvas.clear();

    let grid = session.map().collision_layer(COLLISION_LAYER);
    for tile in grid.query_region(&viewport.world_bounds()) {
        let color = if tile.height < 1.0 { QUARTER_TILE } else { SOLID_TILE };
        canvas.set_draw_color(color);
        canvas.fill_rect(viewport.to_screen(&tile.bounds()))?;
    }

    for snapshot in session.snapshots() {
        render_entity(canvas, viewport, &snapshot)?;
    }

    if session.is_paused() {
        dim(canvas, Color::RGBA(0, 0, 0, 120))?;
    }
    Ok(())
}

fn render_entity(
    canvas: &mut Canvas<Window>,
    viewport: &Viewport,
    snapshot: &EntitySnapshot,
) -> Result<(), String> {
    let body = Aabb::new(
        snapshot.position.x,
        snapshot.position.y,
        snapshot.size.x,
        snapshot.size.y,
    );

    match snapshot.kind {
        EntityKind::Key => {
            canvas.set_draw_color(KEY);
            canvas.fill_rect(viewport.to_screen(&body))?;
        }
        EntityKind::Player => {
            // Walking frames bob the body by a pixel or two
            let bob = snapshot.frame as f32 * 0.02;
            let body = body.translated(0.0, bob);
            canvas.set_draw_color(PLAYER);
            canvas.fill_rect(viewport.to_screen(&body))?;

            // A face strip on the side the player is looking at
            let face_w = body.width() * 0.3;
            let face_x = match snapshot.facing {
                Facing::Right => body.right() - face_w,
                Facing::Left => body.left(),
            };
            let face = Aabb::new(face_x, body.top() - body.height() * 0.35, face_w, body.height() * 0.15);
            canvas.set_draw_color(PLAYER_FACE);
            canvas.fill_rect(viewport.to_screen(&face))?;
        }
    }
    Ok(())
}

/// Level select: one box per level, green when unlocked, with a pip per star.
pub fn render_level_select(
    canvas: &mut Canvas<Window>,
    entries: &[LevelSelectEntry],
) -> Result<(), String> {
    canvas.set_draw_color(Color::RGB(20, 20, 30));
    canvas.clear();

    for (i, entry) in entries.iter().enumerate() {
        let x = 40 + i as i32 * 90;
        let color = if entry.unlocked {
            Color::RGB(60, 160, 80)
        } else {
            Color::RGB(70, 70, 80)
        };
        canvas.set_draw_color(color);
        canvas.fill_rect(Rect::new(x, 60, 70, 70))?;

        canvas.set_draw_color(KEY);
        for star in 0..entry.stars as i32 {
            canvas.fill_rect(Rect::new(x + 6 + star * 22, 140, 14, 14))?;
        }
    }
    Ok(())
}

/// Full-window translucent overlay
pub fn dim(canvas: &mut Canvas<Window>, color: Color) -> Result<(), String> {
    canvas.set_blend_mode(BlendMode::Blend);
    canvas.set_draw_color(color);
    canvas.fill_rect(None)?;
    canvas.set_blend_mode(BlendMode::None);
    Ok(())
}
