//! AbilityController — способности бойца по слотам + dispatch input'а
//!
//! Per-tick: raw кнопки → активации по режиму способности (instant / hold / toggle / charge).
//! Взаимоисключение: если один слот "забрал" input в этом тике, кнопка второго гасится.
//! Слот в состоянии заряда обрабатывается первым (его release всегда коммитится).
//!
//! Контроллер не владеет бойцом — держит только `CombatantId` и переживает его исчезновение.

use std::collections::BTreeMap;

pub mod aim;
pub mod burst;
pub mod input;


pub use aim::{calculate_aim, AimConfig, AimRay};
pub use burst::{BurstScheduler, BURST_INTERVAL, BURST_TICKS};
pub use input::{CameraState, TickInput};

use crate::ability::{build_ability, Ability};
use crate::config::{ActivationMode, ClassLoadout, ClassStats, Slot};
use crate::context::SimContext;
use crate::world::{CombatWorld, CombatantId, FeedbackEvent};

pub struct AbilityController {
    class: String,
    stats: ClassStats,
    abilities: BTreeMap<Slot, Box<dyn Ability>>,
    attached: Option<CombatantId>,
    aim: AimConfig,
    bursts: BurstScheduler,
}

impl AbilityController {
    pub fn new(class: impl Into<String>, stats: ClassStats, aim: AimConfig) -> Self {
        Self {
            class: class.into(),
            stats,
            abilities: BTreeMap::new(),
            attached: None,
            aim,
            bursts: BurstScheduler::new(),
        }
    }

    /// Контроллер с способностями из loadout (слоты уже проверены `validate`)
    pub fn from_loadout(loadout: &ClassLoadout, aim: AimConfig) -> Self {
        let mut controller = Self::new(loadout.class.clone(), loadout.stats, aim);
        for config in &loadout.abilities {
            controller.add_ability(build_ability(config.clone()));
        }
        controller
    }

    /// Слот уникален: новая способность вытесняет старую
    pub fn add_ability(&mut self, ability: Box<dyn Ability>) {
        let slot = ability.core().slot();
        if let Some(mut replaced) = self.abilities.insert(slot, ability) {
            replaced.cleanup();
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn stats(&self) -> &ClassStats {
        &self.stats
    }

    pub fn ability(&self, slot: Slot) -> Option<&dyn Ability> {
        self.abilities.get(&slot).map(|ability| ability.as_ref())
    }

    pub fn ability_mut(&mut self, slot: Slot) -> Option<&mut (dyn Ability + 'static)> {
        self.abilities.get_mut(&slot).map(|ability| ability.as_mut())
    }

    pub fn attached(&self) -> Option<CombatantId> {
        self.attached
    }

    pub fn aim_config(&self) -> &AimConfig {
        &self.aim
    }

    pub fn pending_bursts(&self) -> usize {
        self.bursts.len()
    }

    /// Привязка к бойцу: class stats применяются к нему сразу
    pub fn attach(&mut self, world: &mut dyn CombatWorld, combatant: CombatantId) {
        if self.attached.is_some() {
            self.detach();
        }
        world.apply_class_stats(combatant, &self.stats);
        self.attached = Some(combatant);

        crate::log_info(&format!("Controller '{}' attached to {:?}", self.class, combatant));
    }

    /// Отвязка: заряды сбрасываются без уведомлений, bursts отменяются
    pub fn detach(&mut self) {
        for ability in self.abilities.values_mut() {
            ability.cleanup();
        }
        self.bursts.clear();

        if let Some(combatant) = self.attached.take() {
            crate::log_info(&format!("Controller '{}' detached from {:?}", self.class, combatant));
        }
    }

    /// Один тик input'а. Возвращает input с погашенными кнопками (для movement и т.п.).
    pub fn tick(&mut self, ctx: &mut SimContext, input: TickInput) -> TickInput {
        let mut input = input;
        let Some(user) = self.attached else {
            return input;
        };
        // Мёртвые не кастуют
        if !ctx.world.contains(user) || ctx.world.is_dead(user) {
            return input;
        }

        self.run_bursts(ctx, user, &input);

        let [first, second] = self.dispatch_order();
        if self.update_slot(ctx, user, first, &input) {
            input.clear(second);
        } else if self.update_slot(ctx, user, second, &input) {
            input.clear(first);
        }

        input
    }

    /// Primary → secondary, но заряжающийся слот всегда первым
    fn dispatch_order(&self) -> [Slot; 2] {
        let charging = |slot: Slot| {
            self.abilities
                .get(&slot)
                .is_some_and(|ability| ability.core().is_charging())
        };

        if charging(Slot::Secondary) && !charging(Slot::Primary) {
            [Slot::Secondary, Slot::Primary]
        } else {
            [Slot::Primary, Slot::Secondary]
        }
    }

    /// true — слот "забрал" input в этом тике
    fn update_slot(&mut self, ctx: &mut SimContext, user: CombatantId, slot: Slot, input: &TickInput) -> bool {
        let down = input.button(slot);
        let Some(ability) = self.abilities.get_mut(&slot) else {
            return false;
        };
        let ability = ability.as_mut();

        if !ability.can_use(ctx, user) {
            return false;
        }

        if ability.core().is_chargeable() {
            let mut consumed = false;

            if down {
                ability.charge_level(ctx, user);
                consumed = true;
            }

            if down && !ability.core().is_charging() {
                ability.start_charge(ctx, user);
                consumed = true;
            } else if ability.core().is_charging() && !down {
                activate(ctx, ability, user, &input.camera, &self.aim);
                consumed = true;
            }

            return consumed;
        }

        if !down {
            return false;
        }

        match ability.core().config().activation {
            ActivationMode::Instant => {
                activate(ctx, ability, user, &input.camera, &self.aim);
                true
            }
            ActivationMode::HoldContinuous => {
                activate_tick(ctx, ability, user, &input.camera, &self.aim);
                true
            }
            ActivationMode::ToggleContinuous => {
                self.bursts.schedule(slot, ctx.now);
                false
            }
        }
    }

    fn run_bursts(&mut self, ctx: &mut SimContext, user: CombatantId, input: &TickInput) {
        for slot in self.bursts.due(ctx.now) {
            if let Some(ability) = self.abilities.get_mut(&slot) {
                activate_tick(ctx, ability.as_mut(), user, &input.camera, &self.aim);
            }
        }
    }
}

/// Полная активация: aim → эффект → анимация → cooldown → оплата
fn activate(ctx: &mut SimContext, ability: &mut dyn Ability, user: CombatantId, camera: &CameraState, aim: &AimConfig) {
    let Some(cast) = calculate_aim(ctx, user, camera, aim) else {
        return;
    };

    ability.use_ability(ctx, cast);
    ctx.feedback.push(FeedbackEvent::Animation {
        combatant: user,
        name: ability.core().config().animation.clone(),
    });
    ability.start_cooldown(ctx, user);
    ability.consume_resources(ctx, user);
}

/// Tick-вариант: только эффект, без анимации/cooldown/оплаты
fn activate_tick(ctx: &mut SimContext, ability: &mut dyn Ability, user: CombatantId, camera: &CameraState, aim: &AimConfig) {
    let Some(cast) = calculate_aim(ctx, user, camera, aim) else {
        return;
    };
    ability.use_tick(ctx, cast);
}
