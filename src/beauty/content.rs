//! Localized planner copy

use crate::models::{Language, Persona};

use super::HormonalPhase;

/// One string in both supported languages.
#[derive(Debug, Clone, Copy)]
pub struct Text {
    pub en: &'static str,
    pub ar: &'static str,
}

impl Text {
    pub const fn new(en: &'static str, ar: &'static str) -> Self {
        Self { en, ar }
    }

    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.en,
            Language::Ar => self.ar,
        }
    }
}

pub struct PhaseContent {
    pub name: Text,
    pub description: Text,
    pub sample: Text,
    pub recommended: &'static [Text],
    pub avoid: &'static [Text],
    pub wellness: Text,
}

pub const LASER_KEYWORDS: &[&str] = &["laser", "ipl", "ليزر"];
pub const PEEL_KEYWORDS: &[&str] = &["peel", "تقشير"];
pub const CHEMICAL_KEYWORDS: &[&str] = &["retinol", "acid", "chemical", "ريتينول", "حمض", "كيميائي"];

static COMFORT: PhaseContent = PhaseContent {
    name: Text::new("Comfort", "مرحلة الراحة"),
    description: Text::new(
        "Energy and skin resilience are at their lowest. Keep care gentle and soothing.",
        "الطاقة ومرونة البشرة في أدنى مستوياتها. اجعلي العناية لطيفة ومهدئة.",
    ),
    sample: Text::new(
        "A hydrating mask tonight will calm dull, sensitive skin.",
        "ماسك مرطب الليلة يهدئ البشرة الباهتة والحساسة.",
    ),
    recommended: &[
        Text::new(
            "Gentle cream cleanser and a hydrating mask",
            "منظف كريمي لطيف وماسك مرطب",
        ),
        Text::new(
            "Warm compress and a light facial massage",
            "كمادات دافئة وتدليك خفيف للوجه",
        ),
        Text::new("Rich moisturiser with ceramides", "مرطب غني بالسيراميد"),
        Text::new(
            "Scalp massage with warm almond oil",
            "تدليك فروة الرأس بزيت اللوز الدافئ",
        ),
    ],
    avoid: &[
        Text::new(
            "Waxing and threading while pain sensitivity is higher",
            "الشمع والخيط بينما الحساسية للألم أعلى",
        ),
        Text::new("Laser hair removal sessions", "جلسات إزالة الشعر بالليزر"),
        Text::new("Strong chemical peels", "التقشير الكيميائي القوي"),
    ],
    wellness: Text::new(
        "Rest more, drink warm fluids and add iron-rich foods.",
        "أكثري من الراحة واشربي السوائل الدافئة وتناولي أطعمة غنية بالحديد.",
    ),
};

static REGENERATION: PhaseContent = PhaseContent {
    name: Text::new("Regeneration", "مرحلة التجدد"),
    description: Text::new(
        "Rising estrogen speeds up renewal. Skin handles treatments well.",
        "ارتفاع الإستروجين يسرّع التجدد. البشرة تتقبل العلاجات جيداً.",
    ),
    sample: Text::new(
        "Skin renews fastest now: a good week to start a new serum.",
        "البشرة تتجدد بأسرع ما يمكن الآن: أسبوع مناسب لبدء سيروم جديد.",
    ),
    recommended: &[
        Text::new(
            "Gentle enzyme peel to refresh texture",
            "تقشير إنزيمي لطيف لتجديد ملمس البشرة",
        ),
        Text::new(
            "Start a new serum while skin absorbs actives well",
            "ابدئي سيروم جديد بينما تمتص البشرة المكونات الفعالة جيداً",
        ),
        Text::new("Retinol night treatment", "علاج ليلي بالريتينول"),
        Text::new(
            "Laser hair removal while skin tolerates it best",
            "إزالة الشعر بالليزر حين تتحملها البشرة أفضل",
        ),
        Text::new(
            "Hair trim and deep conditioning",
            "قص أطراف الشعر وترطيب عميق",
        ),
    ],
    avoid: &[
        Text::new(
            "Skipping sunscreen after exfoliation",
            "إهمال واقي الشمس بعد التقشير",
        ),
        Text::new("Over-washing your face", "الإفراط في غسل الوجه"),
    ],
    wellness: Text::new(
        "Energy is climbing: a good time for new habits and movement.",
        "طاقتك في ارتفاع: وقت مناسب لعادات جديدة وللحركة.",
    ),
};

static PEAK_BEAUTY: PhaseContent = PhaseContent {
    name: Text::new("Peak beauty", "ذروة الجمال"),
    description: Text::new(
        "Your natural glow peaks around ovulation. Keep it light and radiant.",
        "يبلغ توهجك الطبيعي ذروته حول الإباضة. حافظي عليه خفيفاً ومشرقاً.",
    ),
    sample: Text::new(
        "Your glow peaks this week: keep makeup light and let skin show.",
        "توهجك في ذروته هذا الأسبوع: اجعلي المكياج خفيفاً ودعي بشرتك تظهر.",
    ),
    recommended: &[
        Text::new(
            "Glow facial or a professional cleansing",
            "جلسة نضارة أو تنظيف بشرة احترافي",
        ),
        Text::new(
            "Light, dewy makeup to show natural radiance",
            "مكياج خفيف ولامع يبرز الإشراقة الطبيعية",
        ),
        Text::new("Laser or IPL session", "جلسة ليزر أو IPL"),
        Text::new(
            "Hair colouring or styling appointments",
            "مواعيد صبغ الشعر أو تصفيفه",
        ),
    ],
    avoid: &[
        Text::new(
            "Heavy, pore-clogging foundations",
            "كريمات الأساس الثقيلة التي تسد المسام",
        ),
        Text::new(
            "Long sun exposure without protection",
            "التعرض الطويل للشمس دون حماية",
        ),
    ],
    wellness: Text::new(
        "You may feel social and confident: plan gatherings and active days.",
        "قد تشعرين بالثقة والرغبة في التواصل: خططي للقاءات وأيام نشيطة.",
    ),
};

static BALANCE: PhaseContent = PhaseContent {
    name: Text::new("Balance", "مرحلة التوازن"),
    description: Text::new(
        "Progesterone rises and skin gets oilier. Focus on balance and calm.",
        "يرتفع البروجسترون وتصبح البشرة أكثر دهنية. ركزي على التوازن والتهدئة.",
    ),
    sample: Text::new(
        "A clay mask twice a week keeps pre-period breakouts in check.",
        "ماسك الطين مرتين أسبوعياً يحد من حبوب ما قبل الدورة.",
    ),
    recommended: &[
        Text::new(
            "Clay mask twice a week for oil control",
            "ماسك الطين مرتين أسبوعياً للتحكم بالدهون",
        ),
        Text::new(
            "Salicylic acid spot treatment",
            "علاج موضعي بحمض الساليسيليك",
        ),
        Text::new("Niacinamide serum for balance", "سيروم النياسيناميد للتوازن"),
        Text::new(
            "Calming herbal tea and early nights",
            "شاي أعشاب مهدئ ونوم مبكر",
        ),
    ],
    avoid: &[
        Text::new(
            "Trying new products while skin is reactive",
            "تجربة منتجات جديدة بينما البشرة متحسسة",
        ),
        Text::new(
            "Salty and sugary snacks that worsen bloating",
            "الوجبات المالحة والسكرية التي تزيد الانتفاخ",
        ),
    ],
    wellness: Text::new(
        "Cravings and mood dips are common: magnesium, walks and sleep help.",
        "الرغبة في الأكل وتقلب المزاج شائعة: المغنيسيوم والمشي والنوم تساعد.",
    ),
};

pub fn phase_content(phase: HormonalPhase) -> &'static PhaseContent {
    match phase {
        HormonalPhase::Comfort => &COMFORT,
        HormonalPhase::Regeneration => &REGENERATION,
        HormonalPhase::PeakBeauty => &PEAK_BEAUTY,
        HormonalPhase::Balance => &BALANCE,
    }
}

pub fn persona_note(persona: Persona) -> Text {
    match persona {
        Persona::Single => Text::new(
            "Plan self-care around your peak days; this time is yours.",
            "خططي لعنايتك بنفسك حول أيام ذروتك؛ هذا الوقت لكِ.",
        ),
        Persona::Married => Text::new(
            "Share your plan with your husband so quieter days are respected.",
            "شاركي خطتك مع زوجك ليحترم أيامك الهادئة.",
        ),
        Persona::Mother => Text::new(
            "Fit short routines into nap times; five minutes still counts.",
            "أدخلي روتيناً قصيراً في أوقات قيلولة الأطفال؛ خمس دقائق تكفي.",
        ),
        Persona::Partner => Text::new(
            "Use this plan to know when she may need extra care and patience.",
            "استخدم هذه الخطة لتعرف متى قد تحتاج إلى اهتمام وصبر أكبر.",
        ),
        Persona::General => Text::new(
            "Small, steady care beats occasional big efforts.",
            "العناية البسيطة المنتظمة أفضل من الجهود الكبيرة المتقطعة.",
        ),
    }
}

pub const UPSELL: Text = Text::new(
    "Unlock your full beauty plan, hijama timing and lunar hair tips with Plus.",
    "افتحي خطتك الجمالية الكاملة ومواعيد الحجامة ونصائح الشعر القمرية مع بلس.",
);

pub const HAIR_WAXING: Text = Text::new(
    "Waxing moon: a trim now is traditionally said to help hair grow faster.",
    "القمر في تزايد: يقال إن قص الشعر الآن يساعد على نموه أسرع.",
);

pub const HAIR_WANING: Text = Text::new(
    "Waning moon: a trim now is traditionally said to keep hair stronger and slower growing.",
    "القمر في تناقص: يقال إن قص الشعر الآن يجعله أقوى وأبطأ نمواً.",
);

pub const HIJAMA_IDEAL: Text = Text::new(
    "Today is ideal for hijama according to the Sunnah days (17, 19, 21).",
    "اليوم مثالي للحجامة حسب أيام السنة (17، 19، 21).",
);

pub const HIJAMA_DURING_PERIOD: Text = Text::new(
    "Avoid hijama during your period; wait until it has ended.",
    "تجنبي الحجامة أثناء الدورة؛ انتظري حتى انتهائها.",
);

pub const HIJAMA_NEXT_DAYS: Text = Text::new(
    "The recommended hijama days are the 17th, 19th and 21st of the lunar month.",
    "أيام الحجامة المستحبة هي 17 و19 و21 من الشهر القمري.",
);

pub const HIJAMA_INFO: Text = Text::new(
    "Curious about hijama? It is traditionally done on lunar days 17, 19 and 21, outside your period.",
    "هل تفكرين في الحجامة؟ تُجرى عادة في الأيام القمرية 17 و19 و21 خارج أيام الدورة.",
);
