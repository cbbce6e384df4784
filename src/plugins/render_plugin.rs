use bevy::math::Isometry2d;
use bevy::prelude::*;
use bevy::text::{Justify, TextBounds};
use std::collections::HashMap;

use crate::config::tuning::Tuning;
use crate::game::match_state::MatchState;
use crate::game::types::Millis;
use crate::plugins::game_plugin::FrameSet;
use crate::render::draw_list::{DrawCommand, DrawList};
use crate::render::{RectStyle, Renderer, TextAlign, dash_segments, scene};

/// Spacing between successive draw calls so later calls land on top.
const Z_STEP: f32 = 0.01;

/// Anything spawned for a single frame.
#[derive(Component)]
struct FrameItem;

#[derive(Resource)]
struct FrameAssets {
    /// Unit circle, scaled per draw.
    circle: Handle<Mesh>,
    materials: HashMap<[u8; 4], Handle<ColorMaterial>>,
}

impl FrameAssets {
    fn material(&mut self, color: Color, materials: &mut Assets<ColorMaterial>) -> Handle<ColorMaterial> {
        self.materials
            .entry(color.to_srgba().to_u8_array())
            .or_insert_with(|| materials.add(color))
            .clone()
    }
}

/// Presents the scene's draw calls with sprites, meshes, gizmos and `Text2d`.
pub struct DrawPlugin;

impl Plugin for DrawPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_frame);
        app.add_systems(
            Update,
            (record_frame, present_frame).chain().in_set(FrameSet::Present),
        );
    }
}

fn setup_frame(mut commands: Commands, tuning: Res<Tuning>, mut meshes: ResMut<Assets<Mesh>>) {
    commands.spawn(Camera2d);
    commands.insert_resource(FrameAssets {
        circle: meshes.add(Circle::new(1.0)),
        materials: HashMap::new(),
    });
    commands.insert_resource(DrawList::new(tuning.window_width, tuning.window_height));
}

fn record_frame(state: Res<MatchState>, time: Res<Time<Fixed>>, mut list: ResMut<DrawList>) {
    list.begin_frame();
    list.resize(state.arena.width, state.arena.height);
    let now = Millis(time.elapsed().as_millis() as u64);
    scene::draw_frame(&state, now, &mut *list);
}

/// Screen space (origin top-left, y down) to world space (origin center, y up).
pub fn to_world(p: Vec2, surface: Vec2) -> Vec2 {
    Vec2::new(p.x - surface.x / 2.0, surface.y / 2.0 - p.y)
}

fn justify(align: TextAlign) -> Justify {
    match align {
        TextAlign::Left => Justify::Left,
        TextAlign::Center => Justify::Center,
        TextAlign::Right => Justify::Right,
    }
}

fn present_frame(
    mut commands: Commands,
    list: Res<DrawList>,
    old: Query<Entity, With<FrameItem>>,
    mut assets: ResMut<FrameAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut clear: ResMut<ClearColor>,
    mut gizmos: Gizmos,
) {
    for entity in &old {
        commands.entity(entity).despawn();
    }

    let surface = list.size();
    let world = |p: Vec2| to_world(p, surface);
    for (i, cmd) in list.commands.iter().enumerate() {
        let z = i as f32 * Z_STEP;
        match cmd {
            DrawCommand::Clear(color) => clear.0 = *color,
            DrawCommand::Circle { center, radius, color } => {
                let material = assets.material(*color, &mut materials);
                commands.spawn((
                    Mesh2d(assets.circle.clone()),
                    MeshMaterial2d(material),
                    Transform::from_translation(world(*center).extend(z)).with_scale(Vec3::splat(*radius)),
                    FrameItem,
                ));
            }
            DrawCommand::Rect {
                rect,
                color,
                style: RectStyle::Fill,
                ..
            } => {
                commands.spawn((
                    Sprite::from_color(*color, rect.size()),
                    Transform::from_translation(world(rect.center()).extend(z)),
                    FrameItem,
                ));
            }
            DrawCommand::Rect {
                rect,
                color,
                style: RectStyle::Border(_),
                corner_radius,
            } => {
                let iso = Isometry2d::from_translation(world(rect.center()));
                if *corner_radius > 0.0 {
                    gizmos
                        .rounded_rect_2d(iso, rect.size(), *color)
                        .corner_radius(*corner_radius);
                } else {
                    gizmos.rect_2d(iso, rect.size(), *color);
                }
            }
            DrawCommand::Line { from, to, color, .. } => {
                gizmos.line_2d(world(*from), world(*to), *color);
            }
            DrawCommand::Polygon { points, color } => {
                // Outline only; gizmos have no fill.
                gizmos.linestrip_2d(points.iter().chain(points.first()).map(|p| world(*p)), *color);
            }
            DrawCommand::DottedPolyline { points, color, dash } => {
                for (a, b) in dash_segments(points, *dash) {
                    gizmos.line_2d(world(a), world(b), *color);
                }
            }
            DrawCommand::Text {
                text,
                font,
                color,
                bounds,
                align,
            } => {
                commands.spawn((
                    Text2d::new(text.clone()),
                    TextFont {
                        font_size: font.size,
                        ..default()
                    },
                    TextColor(*color),
                    TextLayout::new_with_justify(justify(*align)),
                    TextBounds::new(bounds.width().max(1.0), bounds.height().max(1.0)),
                    Transform::from_translation(world(bounds.center()).extend(z)),
                    FrameItem,
                ));
            }
        }
    }
}
