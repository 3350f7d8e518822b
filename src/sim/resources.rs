//! Resource and score state machine
//!
//! A pure transition function: takes the current `RoundStats` and one event,
//! returns the next stats and what the round controller must do about it.
//! Clamping to the resource bounds happens here and nowhere else.

use super::state::{EntityKind, RoundStats};
use crate::consts::*;

/// Inputs to the resource state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundEvent {
    /// One running simulation tick
    Tick { fuel_decay: f32 },
    /// The player ran into an entity
    Collision(EntityKind),
    ExamPassed,
    ExamFailed,
    /// Mini-collection game finished with this sub-score
    MiniCollected(u32),
    /// Recovery gate passed
    Recovered,
}

/// What the round controller should do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue,
    /// HP or fuel exhausted; open the recovery gate
    Failed,
    /// A gate was hit; open an exam or mini-collection interrupt
    OpenGate,
}

#[inline]
fn add_fuel(fuel: f32, amount: f32) -> f32 {
    (fuel + amount).clamp(0.0, MAX_FUEL)
}

#[inline]
fn add_nur(nur: f32, amount: f32) -> f32 {
    (nur + amount).clamp(0.0, MAX_NUR)
}

/// Apply one event to the round stats
pub fn apply(stats: RoundStats, event: RoundEvent) -> (RoundStats, Transition) {
    let mut next = stats;
    let transition = match event {
        RoundEvent::Tick { fuel_decay } => {
            next.score += 1 + u64::from(next.combo / 5);
            next.fuel = add_fuel(next.fuel, -fuel_decay);
            if next.fuel <= 0.0 {
                Transition::Failed
            } else {
                Transition::Continue
            }
        }

        RoundEvent::Collision(kind) => match kind {
            EntityKind::Hazard | EntityKind::Temptation => {
                next.hp = next.hp.saturating_sub(1);
                next.combo = 0;
                if kind == EntityKind::Temptation {
                    next.nur = add_nur(next.nur, -10.0);
                }
                if next.hp == 0 {
                    Transition::Failed
                } else {
                    Transition::Continue
                }
            }
            EntityKind::Fuel => {
                next.fuel = add_fuel(next.fuel, 25.0);
                next.combo += 1;
                next.score += 50;
                Transition::Continue
            }
            EntityKind::Nur => {
                next.nur = add_nur(next.nur, 20.0);
                next.combo += 1;
                next.score += 75;
                Transition::Continue
            }
            EntityKind::Blessing => {
                next.hp = (next.hp + 1).min(MAX_HP);
                next.nur = add_nur(next.nur, 15.0);
                next.fuel = add_fuel(next.fuel, 10.0);
                next.score += 200;
                next.combo += 2;
                Transition::Continue
            }
            EntityKind::GateExam => Transition::OpenGate,
        },

        RoundEvent::ExamPassed => {
            next.nur = add_nur(next.nur, 30.0);
            next.fuel = add_fuel(next.fuel, 20.0);
            next.score += 500;
            next.combo += 3;
            Transition::Continue
        }

        RoundEvent::ExamFailed => {
            next.nur = add_nur(next.nur, -15.0);
            next.combo = 0;
            Transition::Continue
        }

        RoundEvent::MiniCollected(sub_score) => {
            next.score += u64::from(sub_score);
            next.nur = add_nur(next.nur, (sub_score / 8) as f32);
            Transition::Continue
        }

        RoundEvent::Recovered => {
            next.hp = RECOVERY_HP;
            next.fuel = RECOVERY_FUEL;
            Transition::Continue
        }
    };
    (next, transition)
}
