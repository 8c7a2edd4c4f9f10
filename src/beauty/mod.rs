//! Beauty planner
//!
//! Stateless: every call maps (cycle day, lunar day, persona, preferences,
//! premium flag, language) to a localized plan. The hormonal phases here are
//! a coarser vocabulary than [`crate::cycle::CyclePhase`].

pub mod content;
pub mod lunar;

use serde::{Deserialize, Serialize};

use crate::config::{BEAUTY_PERIOD_LAST_DAY, HIJAMA_LUNAR_DAYS};
use crate::models::{BeautyPreferences, HijamaPreference, Language, Persona};

use content::{Text, CHEMICAL_KEYWORDS, LASER_KEYWORDS, PEEL_KEYWORDS};
pub use lunar::{hijri_date, lunar_day, HijriDate};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HormonalPhase {
    Comfort,
    Regeneration,
    PeakBeauty,
    Balance,
}

impl HormonalPhase {
    pub fn key(self) -> &'static str {
        match self {
            HormonalPhase::Comfort => "comfort",
            HormonalPhase::Regeneration => "regeneration",
            HormonalPhase::PeakBeauty => "peak_beauty",
            HormonalPhase::Balance => "balance",
        }
    }
}

pub fn hormonal_phase(cycle_day: u32) -> HormonalPhase {
    match cycle_day {
        1..=5 => HormonalPhase::Comfort,
        6..=12 => HormonalPhase::Regeneration,
        13..=16 => HormonalPhase::PeakBeauty,
        _ => HormonalPhase::Balance,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeautyPlanInput {
    pub cycle_day: u32,
    pub lunar_day: u32,
    pub persona: Persona,
    pub preferences: BeautyPreferences,
    pub is_premium: bool,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FreePlan {
    pub phase_key: HormonalPhase,
    pub phase_name: String,
    pub sample: String,
    pub upsell: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PremiumPlan {
    pub phase_key: HormonalPhase,
    pub phase_name: String,
    pub description: String,
    pub recommended: Vec<String>,
    pub avoid: Vec<String>,
    pub hair_note: String,
    pub hijama_note: Option<String>,
    pub persona_note: String,
    pub wellness_note: String,
    pub lunar_day: u32,
}

/// Free users get a teaser; the full bundle is premium only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BeautyPlan {
    Free(FreePlan),
    Premium(PremiumPlan),
}

impl BeautyPlan {
    pub fn phase(&self) -> HormonalPhase {
        match self {
            BeautyPlan::Free(plan) => plan.phase_key,
            BeautyPlan::Premium(plan) => plan.phase_key,
        }
    }
}

pub fn hair_cut_note(lunar_day: u32, language: Language) -> String {
    let note = if lunar::is_waxing(lunar_day) {
        content::HAIR_WAXING
    } else {
        content::HAIR_WANING
    };
    note.get(language).to_string()
}

/// `None` when the user opted out of hijama. During the period the answer
/// is always "avoid", whatever the lunar day.
pub fn hijama_note(
    lunar_day: u32,
    cycle_day: u32,
    preference: HijamaPreference,
    language: Language,
) -> Option<String> {
    let note = match preference {
        HijamaPreference::No => return None,
        HijamaPreference::Unsure => content::HIJAMA_INFO,
        HijamaPreference::Yes if cycle_day <= BEAUTY_PERIOD_LAST_DAY => {
            content::HIJAMA_DURING_PERIOD
        }
        HijamaPreference::Yes if HIJAMA_LUNAR_DAYS.contains(&lunar_day) => content::HIJAMA_IDEAL,
        HijamaPreference::Yes => content::HIJAMA_NEXT_DAYS,
    };
    Some(note.get(language).to_string())
}

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    let text = text.to_lowercase();
    keywords.iter().any(|k| text.contains(k))
}

/// Drop recommendations the user asked to avoid.
fn passes_preferences(text: &str, preferences: &BeautyPreferences) -> bool {
    !(preferences.avoid_laser && mentions_any(text, LASER_KEYWORDS)
        || preferences.avoid_peels && mentions_any(text, PEEL_KEYWORDS)
        || preferences.natural_only && mentions_any(text, CHEMICAL_KEYWORDS))
}

fn localize_all(texts: &[Text], language: Language) -> impl Iterator<Item = &'static str> + '_ {
    texts.iter().map(move |t| t.get(language))
}

pub fn beauty_plan(input: &BeautyPlanInput) -> BeautyPlan {
    let phase = hormonal_phase(input.cycle_day);
    let phase_content = content::phase_content(phase);
    let language = input.language;

    if !input.is_premium {
        return BeautyPlan::Free(FreePlan {
            phase_key: phase,
            phase_name: phase_content.name.get(language).to_string(),
            sample: phase_content.sample.get(language).to_string(),
            upsell: content::UPSELL.get(language).to_string(),
        });
    }

    let recommended = localize_all(phase_content.recommended, language)
        .filter(|text| passes_preferences(text, &input.preferences))
        .map(str::to_string)
        .collect();

    BeautyPlan::Premium(PremiumPlan {
        phase_key: phase,
        phase_name: phase_content.name.get(language).to_string(),
        description: phase_content.description.get(language).to_string(),
        recommended,
        avoid: localize_all(phase_content.avoid, language)
            .map(str::to_string)
            .collect(),
        hair_note: hair_cut_note(input.lunar_day, language),
        hijama_note: hijama_note(
            input.lunar_day,
            input.cycle_day,
            input.preferences.hijama,
            language,
        ),
        persona_note: content::persona_note(input.persona).get(language).to_string(),
        wellness_note: phase_content.wellness.get(language).to_string(),
        lunar_day: input.lunar_day,
    })
}
