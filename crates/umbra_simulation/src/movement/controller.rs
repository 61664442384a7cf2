//! Locomotion step — один тик state machine
//!
//! Порядок (фиксированный, каждый тик):
//! 1. grounding — ground query, coyote timer, прижим к земле
//! 2. crouch — интерполяция капсулы, veto вставания под потолком
//! 3. horizontal — target speed от multipliers, MoveTowards разгон/торможение, sprint drain
//! 4. vertical — jump buffer, coyote jump, jump-cut, гравитация
//! 5. motion — один collision-resolved displacement + lock depth plane
//! 6. publish — speed/moving/sprinting флаги

use bevy::prelude::*;

use super::components::{Locomotion, LocomotionIntent};
use crate::physical::PhysicalResources;
use crate::physics::{CharacterBody, MotionOutcome};
use crate::shared::move_towards;

/// Итог тика (для событий и тестов)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionTick {
    pub jumped: bool,
    /// Стартовая скорость прыжка (jump_force × jump multiplier), 0 без прыжка
    pub launch_velocity: f32,
    pub sprint_engaged: bool,
    pub motion: MotionOutcome,
}

impl Locomotion {
    /// Один тик locomotion
    ///
    /// `resources == None` — коллаборатор не настроен: sprint/jump разрешены,
    /// multipliers = 1.0 (деградация вместо паники).
    pub fn step<B: CharacterBody + ?Sized>(
        &mut self,
        intent: &LocomotionIntent,
        body: &mut B,
        mut resources: Option<&mut PhysicalResources>,
        dt: f32,
    ) -> LocomotionTick {
        let dt = dt.max(0.0);

        self.update_grounding(body, dt);
        self.resolve_crouch(intent.crouch, body, dt);
        let sprint_engaged = self.update_horizontal(intent, resources.as_deref_mut(), dt);
        let launch_velocity = self.update_vertical(intent, resources.as_deref_mut(), dt);
        let motion = self.apply_motion(body, dt);
        self.publish(sprint_engaged);

        LocomotionTick {
            jumped: launch_velocity.is_some(),
            launch_velocity: launch_velocity.unwrap_or(0.0),
            sprint_engaged,
            motion,
        }
    }

    fn update_grounding<B: CharacterBody + ?Sized>(&mut self, body: &B, dt: f32) {
        self.state.is_grounded = body.is_grounded();

        if self.state.is_grounded {
            self.state.coyote_timer = self.config.coyote_time;
            if self.state.vertical_velocity < 0.0 {
                self.state.vertical_velocity = self.config.ground_stick_velocity;
            }
        } else {
            self.state.coyote_timer -= dt;
        }
    }

    fn resolve_crouch<B: CharacterBody + ?Sized>(&mut self, wants_crouch: bool, body: &mut B, dt: f32) {
        if wants_crouch {
            self.state.is_crouching = true;
        } else if self.state.is_crouching {
            let clearance = self.config.standing_height - self.state.current_capsule_height;
            if clearance <= 0.0 || !body.ceiling_blocked(clearance) {
                self.state.is_crouching = false;
            }
        }

        let target = if self.state.is_crouching {
            self.config.crouch_height
        } else {
            self.config.standing_height
        };

        let current = self.state.current_capsule_height;
        if current == target {
            return;
        }

        let t = (self.config.crouch_transition_speed * dt).clamp(0.0, 1.0);
        let mut height = current + (target - current) * t;
        if (height - target).abs() < 1e-3 {
            height = target;
        }

        self.state.current_capsule_height = height;
        body.resize_capsule(height);
    }

    /// Возвращает true если sprint реально задействован в этом тике
    fn update_horizontal(
        &mut self,
        intent: &LocomotionIntent,
        resources: Option<&mut PhysicalResources>,
        dt: f32,
    ) -> bool {
        let axis = if intent.move_axis.is_finite() {
            intent.move_axis.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let has_input = axis.abs() > self.config.input_deadband;

        let sprint_permitted = resources
            .as_deref()
            .map_or(true, PhysicalResources::has_stamina_for_sprint);
        let sprint_engaged = intent.sprint
            && has_input
            && !self.state.is_crouching
            && self.state.is_grounded
            && sprint_permitted;

        let mut speed = self.config.walk_speed
            * resources
                .as_deref()
                .map_or(1.0, PhysicalResources::movement_multiplier);
        if sprint_engaged {
            speed *= self.config.sprint_multiplier;
        }
        if self.state.is_crouching {
            speed *= self.config.crouch_speed_multiplier;
        }

        let target = axis * speed;
        let rate = if target.abs() > self.config.input_deadband {
            self.config.acceleration
        } else {
            self.config.deceleration
        };

        self.state.horizontal_velocity = move_towards(self.state.horizontal_velocity, target, rate * dt);

        if sprint_engaged {
            if let Some(resources) = resources {
                resources.consume_sprint_stamina(dt);
            }
        }

        sprint_engaged
    }

    /// Возвращает стартовую скорость, если в этом тике начался прыжок
    fn update_vertical(
        &mut self,
        intent: &LocomotionIntent,
        resources: Option<&mut PhysicalResources>,
        dt: f32,
    ) -> Option<f32> {
        if intent.jump_pressed {
            self.state.jump_buffer_timer = self.config.jump_buffer_time;
        }
        self.state.jump_buffer_timer -= dt;

        let jump_permitted = resources
            .as_deref()
            .map_or(true, PhysicalResources::has_stamina_for_jump);

        let mut launch_velocity = None;
        if self.state.jump_buffer_timer > 0.0 && self.state.coyote_timer > 0.0 && jump_permitted {
            let jump_multiplier = resources
                .as_deref()
                .map_or(1.0, PhysicalResources::jump_multiplier);

            self.state.vertical_velocity = self.config.jump_force * jump_multiplier;
            if let Some(resources) = resources {
                resources.consume_jump_stamina();
            }

            self.state.jump_buffer_timer = 0.0;
            self.state.coyote_timer = 0.0;
            self.state.jump_cut_applied = false;
            launch_velocity = Some(self.state.vertical_velocity);
        }

        // Variable-height jump: отпустил кнопку на подъёме → половина скорости, один раз
        if !intent.jump_held && self.state.vertical_velocity > 0.0 && !self.state.jump_cut_applied {
            self.state.vertical_velocity *= 0.5;
            self.state.jump_cut_applied = true;
        }

        let gravity_scale = if self.state.vertical_velocity < 0.0 {
            self.config.fall_multiplier
        } else {
            1.0
        };
        self.state.vertical_velocity += self.config.gravity * gravity_scale * dt;
        self.state.vertical_velocity = self.state.vertical_velocity.max(-self.config.max_fall_speed);

        launch_velocity
    }

    fn apply_motion<B: CharacterBody + ?Sized>(&mut self, body: &mut B, dt: f32) -> MotionOutcome {
        let displacement = Vec3::new(
            self.state.horizontal_velocity * dt,
            self.state.vertical_velocity * dt,
            0.0,
        );

        let outcome = body.move_and_collide(displacement);
        body.lock_depth(self.config.depth_plane);

        if outcome.hit_ceiling && self.state.vertical_velocity > 0.0 {
            self.state.vertical_velocity = 0.0;
        }

        outcome
    }

    fn publish(&mut self, sprint_engaged: bool) {
        self.state.current_speed = self.state.horizontal_velocity.abs();
        self.state.is_moving = self.state.current_speed > self.config.moving_epsilon;
        self.state.is_sprinting = sprint_engaged && self.state.is_moving;
    }
}
