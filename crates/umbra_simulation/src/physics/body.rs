//! CharacterBody — физический seam для locomotion
//!
//! Locomotion не знает кто резолвит коллизии:
//! - FlatGroundBody — headless (плоскости пола/потолка, без Rapier)
//! - RapierCharacterBody — KinematicCharacterController (см. rapier_body.rs)
//!
//! Позиция персонажа = позиция ног (feet). Центр капсулы = feet + height/2,
//! поэтому resize капсулы никогда не двигает ноги.

use bevy::prelude::*;

/// Геометрия капсулы персонажа
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CapsuleGeometry {
    pub height: f32,
    pub radius: f32,
}

impl Default for CapsuleGeometry {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.4,
        }
    }
}

impl CapsuleGeometry {
    /// Смещение центра капсулы над ногами
    pub fn center_offset(&self) -> f32 {
        self.height * 0.5
    }
}

/// Результат collision-resolved перемещения за тик
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionOutcome {
    pub hit_floor: bool,
    pub hit_ceiling: bool,
    pub hit_wall: bool,
}

/// Физическое тело персонажа (ground query, ceiling probe, move, resize)
pub trait CharacterBody {
    /// Контакт с землёй на начало тика
    fn is_grounded(&self) -> bool;

    /// Есть ли препятствие над головой в пределах `clearance` метров
    fn ceiling_blocked(&self, clearance: f32) -> bool;

    /// Применить displacement одним collision-resolved шагом
    fn move_and_collide(&mut self, displacement: Vec3) -> MotionOutcome;

    /// Изменить высоту капсулы, сохраняя позицию ног
    fn resize_capsule(&mut self, height: f32);

    /// Вернуть depth-ось (Z) на плоскость геймплея (2.5D)
    fn lock_depth(&mut self, plane: f32);
}

/// Горизонтальная поверхность (пол или нижняя грань потолка) на отрезке X
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Surface {
    pub min_x: f32,
    pub max_x: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(min_x: f32, max_x: f32, height: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: max_x.max(min_x),
            height,
        }
    }

    /// Бесконечная по X поверхность
    pub fn infinite(height: f32) -> Self {
        Self::new(f32::NEG_INFINITY, f32::INFINITY, height)
    }

    pub fn spans(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }
}

/// Вертикальная стена в точке X на отрезке высот [bottom, top]
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Wall {
    pub x: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Wall {
    pub fn new(x: f32, bottom: f32, top: f32) -> Self {
        Self {
            x,
            bottom: bottom.min(top),
            top: top.max(bottom),
        }
    }

    /// Стена на всю высоту
    pub fn full_height(x: f32) -> Self {
        Self::new(x, f32::NEG_INFINITY, f32::INFINITY)
    }

    fn overlaps(&self, feet_y: f32, head_y: f32) -> bool {
        feet_y < self.top && head_y > self.bottom
    }
}

/// Headless тело: полы/потолки как горизонтальные отрезки, стены как вертикальные
///
/// Stub физики для тестов и headless прогонов (Rapier не подключен).
/// `depth_push` имитирует collision response, выталкивающий тело по Z.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct FlatGroundBody {
    pub feet: Vec3,
    pub capsule: CapsuleGeometry,
    pub floors: Vec<Surface>,
    pub ceilings: Vec<Surface>,
    pub walls: Vec<Wall>,
    /// Допуск ground detection (numerical errors)
    pub ground_tolerance: f32,
    pub depth_push: f32,
}

impl Default for FlatGroundBody {
    fn default() -> Self {
        Self::on_floor(Vec3::ZERO)
    }
}

impl FlatGroundBody {
    /// Тело на бесконечном полу на высоте feet.y
    pub fn on_floor(feet: Vec3) -> Self {
        Self {
            feet,
            capsule: CapsuleGeometry::default(),
            floors: vec![Surface::infinite(feet.y)],
            ceilings: Vec::new(),
            walls: Vec::new(),
            ground_tolerance: 0.02,
            depth_push: 0.0,
        }
    }

    /// Тело без поверхностей (для тестов добавляются через with_*)
    pub fn in_void(feet: Vec3) -> Self {
        Self {
            floors: Vec::new(),
            ..Self::on_floor(feet)
        }
    }

    pub fn with_floor(mut self, floor: Surface) -> Self {
        self.floors.push(floor);
        self
    }

    pub fn with_ceiling(mut self, ceiling: Surface) -> Self {
        self.ceilings.push(ceiling);
        self
    }

    pub fn with_wall(mut self, wall: Wall) -> Self {
        self.walls.push(wall);
        self
    }

    pub fn with_capsule_height(mut self, height: f32) -> Self {
        self.capsule.height = height;
        self
    }

    pub fn head_height(&self) -> f32 {
        self.feet.y + self.capsule.height
    }

    pub fn capsule_center(&self) -> Vec3 {
        self.feet + Vec3::Y * self.capsule.center_offset()
    }

    /// Самая высокая поверхность пола под x, на которую ноги могут опереться из `from_y`
    fn support_below(&self, x: f32, from_y: f32) -> Option<f32> {
        self.floors
            .iter()
            .filter(|floor| floor.spans(x) && floor.height <= from_y + self.ground_tolerance)
            .map(|floor| floor.height)
            .reduce(f32::max)
    }

    /// Самая низкая грань потолка над x, не ниже `from_y`
    fn ceiling_above(&self, x: f32, from_y: f32) -> Option<f32> {
        self.ceilings
            .iter()
            .filter(|ceiling| ceiling.spans(x) && ceiling.height >= from_y - self.ground_tolerance)
            .map(|ceiling| ceiling.height)
            .reduce(f32::min)
    }

    /// Ограничение X стенами: капсула (±radius) не проходит сквозь стену
    fn resolve_walls(&self, from_x: f32, to_x: f32, feet_y: f32) -> Option<f32> {
        let radius = self.capsule.radius;
        let head_y = feet_y + self.capsule.height;
        let blocking = self.walls.iter().filter(|wall| wall.overlaps(feet_y, head_y));

        if to_x > from_x {
            blocking
                .filter(|wall| from_x + radius <= wall.x + self.ground_tolerance && to_x + radius > wall.x)
                .map(|wall| wall.x - radius)
                .reduce(f32::min)
        } else if to_x < from_x {
            blocking
                .filter(|wall| from_x - radius >= wall.x - self.ground_tolerance && to_x - radius < wall.x)
                .map(|wall| wall.x + radius)
                .reduce(f32::max)
        } else {
            None
        }
    }
}

impl CharacterBody for FlatGroundBody {
    fn is_grounded(&self) -> bool {
        self.support_below(self.feet.x, self.feet.y)
            .is_some_and(|floor| self.feet.y - floor <= self.ground_tolerance)
    }

    fn ceiling_blocked(&self, clearance: f32) -> bool {
        let head = self.head_height();
        self.ceiling_above(self.feet.x, head)
            .is_some_and(|ceiling| ceiling - head < clearance)
    }

    fn move_and_collide(&mut self, displacement: Vec3) -> MotionOutcome {
        let mut outcome = MotionOutcome::default();
        let start = self.feet;
        let mut next = start + displacement;
        next.z += self.depth_push;

        if let Some(x) = self.resolve_walls(start.x, next.x, start.y) {
            next.x = x;
            outcome.hit_wall = true;
        }

        if displacement.y <= 0.0 {
            if let Some(floor) = self.support_below(next.x, start.y) {
                if next.y < floor {
                    next.y = floor;
                    outcome.hit_floor = true;
                }
            }
        } else {
            let head = start.y + self.capsule.height;
            if let Some(ceiling) = self.ceiling_above(next.x, head) {
                if next.y + self.capsule.height > ceiling {
                    next.y = (ceiling - self.capsule.height).max(start.y);
                    outcome.hit_ceiling = true;
                }
            }
        }

        self.feet = next;
        outcome
    }

    fn resize_capsule(&mut self, height: f32) {
        // feet не трогаем: центр пересчитывается из height
        self.capsule.height = height.max(0.0);
    }

    fn lock_depth(&mut self, plane: f32) {
        self.feet.z = plane;
    }
}

/// Система: синхронизация Transform с headless телом (Transform = центр капсулы)
pub fn sync_body_transform(mut query: Query<(&FlatGroundBody, &mut Transform)>) {
    for (body, mut transform) in query.iter_mut() {
        transform.translation = body.capsule_center();
    }
}
