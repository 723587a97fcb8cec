//=========================================================================
// Physics Integrator
//=========================================================================
//
// Vertical motion of the character: semi-implicit Euler under constant
// gravity, with a single ground-contact rule.
//
// Frame order (driven by Simulation::step):
//   integrate(dt, ground)   position += velocity * dt, then clamp
//   ...other systems...
//   apply_gravity(g, dt)    velocity -= g * dt, for the next frame
//
// Gravity applies in every state. Flying is held aloft only because its
// ground level is higher, so the clamp catches the character there.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Character ===========================================================

/// Vertical body of the player-controlled sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    vertical_position: f64,
    vertical_velocity: f64,
    airborne_by_jump: bool,
}

impl Character {
    /// Creates a character resting on `ground_level`.
    pub fn new(ground_level: f64) -> Self {
        Self {
            vertical_position: ground_level,
            vertical_velocity: 0.0,
            airborne_by_jump: false,
        }
    }

    //--- Integration ------------------------------------------------------

    /// Advances the position with the velocity from the previous frame and
    /// resolves ground contact. Returns `true` if the character was clamped.
    pub fn integrate(&mut self, dt: f64, ground_level: f64) -> bool {
        self.vertical_position += self.vertical_velocity * dt;
        self.resolve_ground(ground_level)
    }

    /// Applies one frame of gravity to the velocity.
    pub fn apply_gravity(&mut self, gravity: f64, dt: f64) {
        self.vertical_velocity -= gravity * dt;
    }

    /// Clamps the character onto `ground_level` if it is below it.
    ///
    /// Landing and falling are not distinguished: both stop the body and
    /// end any jump in progress.
    pub fn resolve_ground(&mut self, ground_level: f64) -> bool {
        if self.vertical_position < ground_level {
            if self.airborne_by_jump {
                trace!(target: "sim::physics", "Landed at {}", ground_level);
            }
            self.vertical_position = ground_level;
            self.vertical_velocity = 0.0;
            self.airborne_by_jump = false;
            true
        } else {
            false
        }
    }

    //--- Jump -------------------------------------------------------------

    /// Starts a jump if the character is exactly on `ground_level`.
    ///
    /// Returns `false` (and changes nothing) while airborne.
    pub fn jump(&mut self, impulse: f64, ground_level: f64) -> bool {
        if !self.is_grounded(ground_level) {
            return false;
        }

        self.vertical_velocity = impulse;
        self.airborne_by_jump = true;
        true
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_grounded(&self, ground_level: f64) -> bool {
        self.vertical_position == ground_level
    }

    pub fn vertical_position(&self) -> f64 {
        self.vertical_position
    }

    pub fn vertical_velocity(&self) -> f64 {
        self.vertical_velocity
    }

    pub fn is_airborne_by_jump(&self) -> bool {
        self.airborne_by_jump
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
