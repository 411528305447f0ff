//! Classifier output labels
//!
//! The classifier predicts an integer class id; this table is the label
//! contract of the trained model.

/// Label for any class id outside the table
pub const UNKNOWN_FERTILIZER: &str = "Unknown Fertilizer";

/// Number of classes the model is trained on (ids 1..=19)
pub const FERTILIZER_COUNT: usize = 19;

static FERTILIZERS: &[(i64, &str)] = &[
    (1, "Urea"),
    (2, "DAP"),
    (3, "MOP"),
    (4, "10:26:26 NPK"),
    (5, "SSP"),
    (6, "Magnesium Sulphate"),
    (7, "13:32:26 NPK"),
    (8, "12:32:16 NPK"),
    (9, "50:26:26 NPK"),
    (10, "19:19:19 NPK"),
    (11, "Chilated Micronutrient"),
    (12, "18:46:00 NPK"),
    (13, "Sulphur"),
    (14, "20:20:20 NPK"),
    (15, "Ammonium Sulphate"),
    (16, "Ferrous Sulphate"),
    (17, "White Potash"),
    (18, "10:10:10 NPK"),
    (19, "Hydrated Lime"),
];

/// Map a class id to its fertilizer name; never fails.
pub fn fertilizer_name(class_id: i64) -> &'static str {
    FERTILIZERS
        .iter()
        .find(|(id, _)| *id == class_id)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_FERTILIZER)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_one_to_nineteen() {
        assert_eq!(FERTILIZERS.len(), FERTILIZER_COUNT);
        for id in 1..=19 {
            assert_ne!(fertilizer_name(id), UNKNOWN_FERTILIZER, "class {} should be mapped", id);
        }
    }

    #[test]
    fn test_known_labels() {
        assert_eq!(fertilizer_name(1), "Urea");
        assert_eq!(fertilizer_name(4), "10:26:26 NPK");
        assert_eq!(fertilizer_name(11), "Chilated Micronutrient");
        assert_eq!(fertilizer_name(12), "18:46:00 NPK");
        assert_eq!(fertilizer_name(19), "Hydrated Lime");
    }

    #[test]
    fn test_out_of_range_ids() {
        for id in [0, -1, 20, 100, i64::MIN, i64::MAX] {
            assert_eq!(fertilizer_name(id), UNKNOWN_FERTILIZER, "id {}", id);
        }
    }
}
