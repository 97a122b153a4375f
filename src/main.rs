//=========================================================================
// Stagecraft Demo
//=========================================================================
//
// Three-lane tap game built on the public API only.
//
// Scenes:
//   Title ──tap──> Play ──no lives left──> (push) GameOver ──tap──> Title
//
// Play scene tree:
//   PlayField (root)
//     ├─ blocks: group of falling Block nodes
//     └─ effects: group of self-removing Flash nodes
//
// Run with `RUST_LOG=debug` to trace scene transitions.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info};
use rand::rngs::ThreadRng;
use rand::Rng;

use stagecraft::prelude::*;

//=== Layout ==============================================================

const LANES: usize = 3;
const BLOCK_HEIGHT: f32 = 48.0;
const HIT_LINE: f32 = 0.85;
const HIT_WINDOW: f32 = 70.0;
const STARTING_LIVES: u32 = 3;

const INK: Color = Color::rgb(40, 40, 48);
const ACCENT: Color = Color::rgb(230, 90, 60);
const LANE_COLORS: [Color; LANES] = [
    Color::rgb(70, 130, 220),
    Color::rgb(80, 180, 110),
    Color::rgb(220, 170, 50),
];

fn lane_width(canvas_width: u32) -> f32 {
    canvas_width as f32 / LANES as f32
}

fn lane_rect(lane: usize, canvas_width: u32, canvas_height: u32) -> Rect {
    let lw = lane_width(canvas_width);
    Rect::new(lw * lane as f32, 0.0, lw, canvas_height as f32)
}

//=========================================================================
// Title Scene
//=========================================================================

struct TitleScreen {
    controller: ControllerHandle,
    clock: f32,
    leaving: bool,
}

fn title_scene(controller: &ControllerHandle) -> Scene {
    Scene::new(
        controller,
        TitleScreen {
            controller: controller.clone(),
            clock: 0.0,
            leaving: false,
        },
    )
}

impl Behavior for TitleScreen {
    fn on_update(&mut self, _node: &Node, ctx: &FrameContext<'_>) {
        self.clock += ctx.delta_time();

        if !self.leaving && ctx.input().touch_count() > 0 {
            info!("Starting a new run");
            self.leaving = true;
            self.controller.change_scene(play_scene(&self.controller));
        }
    }

    fn on_render(&self, _node: &Node, canvas: &mut dyn Canvas) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);

        canvas.fill_rect(Rect::centered(w / 2.0, h * 0.35, w * 0.7, 90.0), INK, 1.0);
        for (lane, color) in LANE_COLORS.iter().enumerate() {
            let x = w * (0.3 + 0.2 * lane as f32);
            canvas.fill_rect(Rect::centered(x, h * 0.5, 60.0, 60.0), *color, 1.0);
        }

        if self.clock % 1.0 < 0.6 {
            canvas.fill_rect(Rect::centered(w / 2.0, h * 0.7, w * 0.4, 24.0), ACCENT, 1.0);
        }
    }
}

//=========================================================================
// Play Scene
//=========================================================================

//--- Block ---------------------------------------------------------------

struct Block {
    lane: usize,
    y: f32,
    speed: f32,
}

impl Block {
    fn rect(&self, canvas_width: u32) -> Rect {
        let lw = lane_width(canvas_width);
        Rect::new(lw * self.lane as f32 + 8.0, self.y, lw - 16.0, BLOCK_HEIGHT)
    }

    fn center_y(&self) -> f32 {
        self.y + BLOCK_HEIGHT / 2.0
    }
}

impl Behavior for Block {
    fn on_update(&mut self, _node: &Node, ctx: &FrameContext<'_>) {
        self.y += self.speed * ctx.delta_time();
    }

    fn on_render(&self, _node: &Node, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.rect(canvas.width()), LANE_COLORS[self.lane], 1.0);
    }
}

//--- Flash ---------------------------------------------------------------

/// Hit feedback that fades and removes itself.
struct Flash {
    rect: Rect,
    remaining: f32,
}

impl Flash {
    const LIFETIME: f32 = 0.25;
}

impl Behavior for Flash {
    fn on_update(&mut self, node: &Node, ctx: &FrameContext<'_>) {
        self.remaining -= ctx.delta_time();
        if self.remaining <= 0.0 {
            node.remove_self();
        }
    }

    fn on_render(&self, _node: &Node, canvas: &mut dyn Canvas) {
        let alpha = (self.remaining / Flash::LIFETIME).clamp(0.0, 1.0);
        canvas.fill_rect(self.rect, Color::WHITE, alpha);
    }
}

//--- PlayField -----------------------------------------------------------

struct PlayField {
    controller: ControllerHandle,
    blocks: NodeRef,
    effects: NodeRef,
    rng: ThreadRng,
    spawn_timer: f32,
    spawn_interval: f32,
    fall_speed: f32,
    lives: u32,
    hits: u32,
    game_over: bool,
}

fn play_scene(controller: &ControllerHandle) -> Scene {
    let blocks = Node::group();
    let effects = Node::group();

    let scene = Scene::new(
        controller,
        PlayField {
            controller: controller.clone(),
            blocks: blocks.clone(),
            effects: effects.clone(),
            rng: rand::rng(),
            spawn_timer: 0.5,
            spawn_interval: 1.0,
            fall_speed: 260.0,
            lives: STARTING_LIVES,
            hits: 0,
            game_over: false,
        },
    );
    scene.node().add_child(blocks);
    scene.node().add_child(effects);
    scene
}

impl PlayField {
    fn spawn(&mut self, dt: f32) {
        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 {
            return;
        }

        self.spawn_timer += self.spawn_interval;
        self.spawn_interval = (self.spawn_interval * 0.98).max(0.35);
        self.fall_speed = (self.fall_speed + 4.0).min(700.0);

        self.blocks.add_child(Node::new(Block {
            lane: self.rng.random_range(0..LANES),
            y: -BLOCK_HEIGHT,
            speed: self.fall_speed,
        }));
    }

    /// Removes the block closest to the hit line in the tapped lane.
    fn resolve_taps(&mut self, input: &dyn InputSource) {
        let width = self.controller.canvas_width();
        let height = self.controller.canvas_height();
        let hit_y = height as f32 * HIT_LINE;
        let mut taken: Vec<NodeRef> = Vec::new();

        for i in 0..input.touch_count() {
            let point = input.touch_point(i);
            let Some(lane) =
                (0..LANES).find(|&lane| lane_rect(lane, width, height).contains(point.x, point.y))
            else {
                continue;
            };

            let mut best: Option<(f32, NodeRef, Rect)> = None;
            self.blocks.for_each_child(|child| {
                if taken.iter().any(|t| t.is(child)) {
                    return;
                }
                let Some(block) = child.behavior::<Block>() else {
                    return;
                };
                let distance = (block.center_y() - hit_y).abs();
                if block.lane == lane
                    && distance <= HIT_WINDOW
                    && best.as_ref().map_or(true, |(d, _, _)| distance < *d)
                {
                    best = Some((distance, child.clone(), block.rect(width)));
                }
            });

            if let Some((_, node, rect)) = best {
                node.remove_self();
                self.effects.add_child(Node::new(Flash {
                    rect,
                    remaining: Flash::LIFETIME,
                }));
                self.hits += 1;
                taken.push(node);
            }
        }
    }

    /// Drops blocks that fell off the canvas; each one costs a life.
    fn collect_misses(&mut self) {
        let bottom = self.controller.canvas_height() as f32;
        let mut missed = 0;

        self.blocks.for_each_child(|child| {
            if child.behavior::<Block>().is_some_and(|b| b.y > bottom) {
                child.remove_self();
                missed += 1;
            }
        });

        self.lives = self.lives.saturating_sub(missed);
    }
}

impl Behavior for PlayField {
    fn on_update(&mut self, _node: &Node, ctx: &FrameContext<'_>) {
        if self.game_over {
            return;
        }

        self.spawn(ctx.delta_time());
        self.resolve_taps(ctx.input());
        self.collect_misses();

        if self.lives == 0 {
            info!("Run over after {} hits", self.hits);
            self.game_over = true;
            self.controller.push_scene(game_over_scene(&self.controller));
        }
    }

    fn on_render(&self, _node: &Node, canvas: &mut dyn Canvas) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        let lw = lane_width(canvas.width());

        for lane in 1..LANES {
            canvas.fill_rect(Rect::new(lw * lane as f32 - 1.0, 0.0, 2.0, h), INK, 0.2);
        }
        canvas.fill_rect(Rect::new(0.0, h * HIT_LINE - 2.0, w, 4.0), INK, 0.8);

        for life in 0..self.lives {
            canvas.fill_rect(Rect::new(16.0 + life as f32 * 28.0, 16.0, 20.0, 20.0), ACCENT, 1.0);
        }
    }
}

//=========================================================================
// Game Over Scene
//=========================================================================

struct GameOver {
    controller: ControllerHandle,
    wait: f32,
    leaving: bool,
}

impl GameOver {
    const INPUT_DELAY: f32 = 1.0;
}

fn game_over_scene(controller: &ControllerHandle) -> Scene {
    Scene::new(
        controller,
        GameOver {
            controller: controller.clone(),
            wait: GameOver::INPUT_DELAY,
            leaving: false,
        },
    )
}

impl Behavior for GameOver {
    fn on_update(&mut self, _node: &Node, ctx: &FrameContext<'_>) {
        self.wait = (self.wait - ctx.delta_time()).max(0.0);

        if !self.leaving && self.wait <= 0.0 && ctx.input().touch_count() > 0 {
            self.leaving = true;
            self.controller.change_scene(title_scene(&self.controller));
        }
    }

    fn on_render(&self, _node: &Node, canvas: &mut dyn Canvas) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);

        canvas.fill_rect(canvas.bounds(), INK, 0.6);
        canvas.fill_rect(Rect::centered(w / 2.0, h * 0.4, w * 0.6, 80.0), ACCENT, 1.0);

        if self.wait <= 0.0 {
            canvas.fill_rect(Rect::centered(w / 2.0, h * 0.6, w * 0.4, 24.0), Color::WHITE, 1.0);
        }
    }
}

//=========================================================================
// Entry Point
//=========================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = EngineBuilder::new()
        .with_title("Stagecraft Lanes")
        .build()
        .init(|controller| {
            let handle = controller.handle();
            controller.push_scene(title_scene(&handle));
        })
        .run();

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
