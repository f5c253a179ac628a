// THEORY:
// The catalog is the fixed, ordered list of conditions the scorer predicts over.
// Its order is load-bearing: position `i` in the catalog is position `i` in every
// `ScoreVector` and in the kernel table. It is `static` data with no mutation
// path, shared by every analysis on every thread.
//
// The food and remedy lists are illustrative home-care suggestions shown next to
// a result. They are not treatment advice.

/// Number of conditions the engine scores.
pub const CONDITION_COUNT: usize = 8;

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionDefinition {
    /// Stable machine identifier (snake_case).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    pub description: &'static str,
    pub foods: &'static [&'static str],
    pub remedies: &'static [&'static str],
}

pub static CATALOG: [ConditionDefinition; CONDITION_COUNT] = [
    ConditionDefinition {
        id: "melanoma",
        name: "Melanoma",
        description: "A cancer of pigment-producing cells, often an irregular, multi-coloured or changing mole.",
        foods: &[
            "Tomatoes and other lycopene-rich produce",
            "Leafy greens",
            "Fatty fish rich in omega-3",
            "Green tea",
        ],
        remedies: &[
            "See a dermatologist promptly for any changing mole",
            "Use broad-spectrum sunscreen daily",
            "Avoid tanning beds",
            "Photograph the spot monthly to track changes",
        ],
    },
    ConditionDefinition {
        id: "melanocytic_nevus",
        name: "Melanocytic Nevus",
        description: "A common, usually benign mole formed by clusters of pigment cells.",
        foods: &[
            "Berries and other antioxidant-rich fruit",
            "Carrots and sweet potatoes",
            "Nuts and seeds",
        ],
        remedies: &[
            "Check moles regularly using the ABCDE rule",
            "Protect moles from sunburn",
            "Have new or changing moles examined",
        ],
    },
    ConditionDefinition {
        id: "basal_cell_carcinoma",
        name: "Basal Cell Carcinoma",
        description: "A slow-growing skin cancer that often looks like a pearly bump or a sore that does not heal.",
        foods: &[
            "Citrus fruit",
            "Cruciferous vegetables such as broccoli",
            "Fatty fish",
        ],
        remedies: &[
            "Book a dermatology appointment for any non-healing sore",
            "Wear hats and protective clothing outdoors",
            "Reapply sunscreen every two hours in the sun",
        ],
    },
    ConditionDefinition {
        id: "actinic_keratosis",
        name: "Actinic Keratosis",
        description: "A rough, scaly patch caused by years of sun exposure that can become cancerous.",
        foods: &[
            "Green tea",
            "Leafy greens",
            "Foods rich in niacin such as poultry and legumes",
        ],
        remedies: &[
            "Moisturise rough patches gently",
            "Limit midday sun exposure",
            "Ask a clinician about removal options",
        ],
    },
    ConditionDefinition {
        id: "benign_keratosis",
        name: "Benign Keratosis",
        description: "A non-cancerous, often waxy or stuck-on growth such as a seborrheic keratosis.",
        foods: &[
            "Whole grains",
            "Colourful vegetables",
            "Plenty of water",
        ],
        remedies: &[
            "Avoid picking or scratching the growth",
            "Keep the area moisturised",
            "Have it checked if it bleeds or changes quickly",
        ],
    },
    ConditionDefinition {
        id: "dermatitis",
        name: "Dermatitis",
        description: "Inflamed, itchy and red skin, commonly from eczema or contact irritation.",
        foods: &[
            "Oily fish and flaxseed",
            "Probiotic foods such as yogurt",
            "Oats",
        ],
        remedies: &[
            "Use fragrance-free emollients",
            "Take lukewarm rather than hot showers",
            "Identify and avoid irritants",
            "Try a cool compress for itching",
        ],
    },
    ConditionDefinition {
        id: "vascular_lesion",
        name: "Vascular Lesion",
        description: "A red or purple mark formed by blood vessels, such as a cherry angioma or haemangioma.",
        foods: &[
            "Vitamin C-rich fruit",
            "Bell peppers",
            "Dark leafy greens",
        ],
        remedies: &[
            "Avoid trauma to the area",
            "Apply gentle pressure if it bleeds",
            "Ask a clinician about laser options",
        ],
    },
    ConditionDefinition {
        id: "squamous_cell_carcinoma",
        name: "Squamous Cell Carcinoma",
        description: "A skin cancer that often appears as a firm red nodule or a scaly, crusted patch.",
        foods: &[
            "Carrots and other beta-carotene sources",
            "Green tea",
            "Fatty fish",
        ],
        remedies: &[
            "Seek prompt medical evaluation",
            "Use daily sun protection",
            "Avoid peak UV hours",
        ],
    },
];

/// Catalog entry at `index`.
pub fn get(index: usize) -> Option<&'static ConditionDefinition> {
    CATALOG.get(index)
}

/// Position of `id` in the catalog.
pub fn position(id: &str) -> Option<usize> {
    CATALOG.iter().position(|condition| condition.id == id)
}

pub fn find(id: &str) -> Option<&'static ConditionDefinition> {
    position(id).map(|index| &CATALOG[index])
}
