use serde::{Serialize, Serializer};
use std::fmt;

/// Qualitative explanation of a share move, from brand growth against
/// category growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareStory {
    GainOutgrowingCategory,
    GainDecliningSlower,
    LossGrowingSlower,
    LossDecliningFaster,
    CannotDetermine,
}

impl ShareStory {
    pub fn label(&self) -> &'static str {
        match self {
            ShareStory::GainOutgrowingCategory => "share gain: brand growing faster than category",
            ShareStory::GainDecliningSlower => {
                "share gain: brand declining slower than category (relatively stronger)"
            }
            ShareStory::LossGrowingSlower => "share loss: brand growing slower than category",
            ShareStory::LossDecliningFaster => {
                "share loss: brand declining faster than category (relatively weaker)"
            }
            ShareStory::CannotDetermine => "cannot determine: missing prior-period base",
        }
    }
}

impl fmt::Display for ShareStory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ShareStory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Both growth rates are year-over-year percentages. A tie with a
/// non-negative category counts as a gain.
pub fn classify_share_move(brand_growth: Option<f64>, category_growth: Option<f64>) -> ShareStory {
    let (Some(brand), Some(category)) = (brand_growth, category_growth) else {
        return ShareStory::CannotDetermine;
    };
    if brand.is_nan() || category.is_nan() {
        return ShareStory::CannotDetermine;
    }
    if brand >= category && category >= 0.0 {
        ShareStory::GainOutgrowingCategory
    } else if brand >= 0.0 && category < 0.0 {
        ShareStory::GainDecliningSlower
    } else if brand < category && category >= 0.0 {
        ShareStory::LossGrowingSlower
    } else {
        ShareStory::LossDecliningFaster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(10.0), Some(5.0), ShareStory::GainOutgrowingCategory)]
    #[case(Some(5.0), Some(5.0), ShareStory::GainOutgrowingCategory)]
    #[case(Some(0.0), Some(0.0), ShareStory::GainOutgrowingCategory)]
    #[case(Some(2.0), Some(-3.0), ShareStory::GainDecliningSlower)]
    #[case(Some(0.0), Some(-3.0), ShareStory::GainDecliningSlower)]
    #[case(Some(25.0), Some(56.25), ShareStory::LossGrowingSlower)]
    #[case(Some(-4.0), Some(1.0), ShareStory::LossGrowingSlower)]
    #[case(Some(-10.0), Some(-3.0), ShareStory::LossDecliningFaster)]
    #[case(Some(-1.0), Some(-3.0), ShareStory::LossDecliningFaster)]
    #[case(None, Some(3.0), ShareStory::CannotDetermine)]
    #[case(Some(3.0), None, ShareStory::CannotDetermine)]
    #[case(None, None, ShareStory::CannotDetermine)]
    fn classifies(
        #[case] brand: Option<f64>,
        #[case] category: Option<f64>,
        #[case] expected: ShareStory,
    ) {
        assert_eq!(classify_share_move(brand, category), expected);
    }

    #[test]
    fn every_sign_combination_has_exactly_one_label() {
        let values = [None, Some(-7.5), Some(0.0), Some(7.5)];
        for brand in values {
            for category in values {
                let story = classify_share_move(brand, category);
                if brand.is_none() || category.is_none() {
                    assert_eq!(story, ShareStory::CannotDetermine);
                } else {
                    assert_ne!(story, ShareStory::CannotDetermine);
                }
            }
        }
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&ShareStory::LossGrowingSlower).unwrap();
        assert_eq!(json, "\"share loss: brand growing slower than category\"");
    }
}
