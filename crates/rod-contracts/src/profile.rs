use std::fmt;

use serde::{Deserialize, Serialize};

/// Industry options offered by the onboarding wizard. `Other` is the
/// escape hatch for anything the list misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Industry {
    #[serde(rename = "Marketing & Advertising")]
    MarketingAdvertising,
    #[serde(rename = "E-commerce & Retail")]
    EcommerceRetail,
    #[serde(rename = "Content Creation & Social Media")]
    ContentCreation,
    #[serde(rename = "Education & Training")]
    EducationTraining,
    #[serde(rename = "Real Estate")]
    RealEstate,
    #[serde(rename = "Technology & Software")]
    TechnologySoftware,
    #[serde(rename = "Healthcare & Wellness")]
    HealthcareWellness,
    #[serde(rename = "Food & Beverage")]
    FoodBeverage,
    #[serde(rename = "Fashion & Beauty")]
    FashionBeauty,
    #[serde(rename = "Entertainment & Media")]
    EntertainmentMedia,
    #[serde(rename = "Finance & Business")]
    FinanceBusiness,
    Other,
}

impl Industry {
    pub const ALL: &'static [Industry] = &[
        Industry::MarketingAdvertising,
        Industry::EcommerceRetail,
        Industry::ContentCreation,
        Industry::EducationTraining,
        Industry::RealEstate,
        Industry::TechnologySoftware,
        Industry::HealthcareWellness,
        Industry::FoodBeverage,
        Industry::FashionBeauty,
        Industry::EntertainmentMedia,
        Industry::FinanceBusiness,
        Industry::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Industry::MarketingAdvertising => "Marketing & Advertising",
            Industry::EcommerceRetail => "E-commerce & Retail",
            Industry::ContentCreation => "Content Creation & Social Media",
            Industry::EducationTraining => "Education & Training",
            Industry::RealEstate => "Real Estate",
            Industry::TechnologySoftware => "Technology & Software",
            Industry::HealthcareWellness => "Healthcare & Wellness",
            Industry::FoodBeverage => "Food & Beverage",
            Industry::FashionBeauty => "Fashion & Beauty",
            Industry::EntertainmentMedia => "Entertainment & Media",
            Industry::FinanceBusiness => "Finance & Business",
            Industry::Other => "Other",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Primary purpose for generated assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    #[serde(rename = "Social media posts")]
    SocialMediaPosts,
    #[serde(rename = "Website content")]
    WebsiteContent,
    #[serde(rename = "Blog articles")]
    BlogArticles,
    #[serde(rename = "Product mockups")]
    ProductMockups,
    #[serde(rename = "Marketing materials")]
    MarketingMaterials,
    Presentations,
    #[serde(rename = "Advertising campaigns")]
    AdvertisingCampaigns,
    #[serde(rename = "Print materials")]
    PrintMaterials,
    #[serde(rename = "Personal projects")]
    PersonalProjects,
    Other,
}

impl Purpose {
    pub const ALL: &'static [Purpose] = &[
        Purpose::SocialMediaPosts,
        Purpose::WebsiteContent,
        Purpose::BlogArticles,
        Purpose::ProductMockups,
        Purpose::MarketingMaterials,
        Purpose::Presentations,
        Purpose::AdvertisingCampaigns,
        Purpose::PrintMaterials,
        Purpose::PersonalProjects,
        Purpose::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Purpose::SocialMediaPosts => "Social media posts",
            Purpose::WebsiteContent => "Website content",
            Purpose::BlogArticles => "Blog articles",
            Purpose::ProductMockups => "Product mockups",
            Purpose::MarketingMaterials => "Marketing materials",
            Purpose::Presentations => "Presentations",
            Purpose::AdvertisingCampaigns => "Advertising campaigns",
            Purpose::PrintMaterials => "Print materials",
            Purpose::PersonalProjects => "Personal projects",
            Purpose::Other => "Other",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Preferred rendering style for image requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageStyle {
    Photorealistic,
    Illustration,
    Abstract,
    Minimalist,
    #[serde(rename = "Vintage/Retro")]
    VintageRetro,
    #[serde(rename = "Modern/Futuristic")]
    ModernFuturistic,
    #[serde(rename = "Artistic/Painterly")]
    ArtisticPainterly,
    #[serde(rename = "Corporate/Professional")]
    CorporateProfessional,
    #[serde(rename = "Casual/Friendly")]
    CasualFriendly,
    #[serde(rename = "Mixed/Varies")]
    MixedVaries,
}

impl ImageStyle {
    pub const ALL: &'static [ImageStyle] = &[
        ImageStyle::Photorealistic,
        ImageStyle::Illustration,
        ImageStyle::Abstract,
        ImageStyle::Minimalist,
        ImageStyle::VintageRetro,
        ImageStyle::ModernFuturistic,
        ImageStyle::ArtisticPainterly,
        ImageStyle::CorporateProfessional,
        ImageStyle::CasualFriendly,
        ImageStyle::MixedVaries,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ImageStyle::Photorealistic => "Photorealistic",
            ImageStyle::Illustration => "Illustration",
            ImageStyle::Abstract => "Abstract",
            ImageStyle::Minimalist => "Minimalist",
            ImageStyle::VintageRetro => "Vintage/Retro",
            ImageStyle::ModernFuturistic => "Modern/Futuristic",
            ImageStyle::ArtisticPainterly => "Artistic/Painterly",
            ImageStyle::CorporateProfessional => "Corporate/Professional",
            ImageStyle::CasualFriendly => "Casual/Friendly",
            ImageStyle::MixedVaries => "Mixed/Varies",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Profile collected by the onboarding wizard. A skipped wizard leaves
/// every field unset; request templating falls back to generic phrasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub industry: Option<Industry>,
    pub niche: String,
    pub purpose: Option<Purpose>,
    pub goals: String,
    pub image_style: Option<ImageStyle>,
}

pub const WIZARD_FINAL_STEP: u8 = 4;

/// 4-step onboarding state machine over a draft profile.
///
/// Steps gate on the same fields the original flow validated: name, then
/// industry + niche, then purpose + goals, then image style. Completing
/// step 4 or skipping freezes the profile; setters are no-ops afterwards.
#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    step: u8,
    complete: bool,
    draft: UserProfile,
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self {
            step: 1,
            complete: false,
            draft: UserProfile::default(),
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn draft(&self) -> &UserProfile {
        &self.draft
    }

    pub fn can_proceed(&self) -> bool {
        match self.step {
            1 => !self.draft.name.trim().is_empty(),
            2 => self.draft.industry.is_some() && !self.draft.niche.trim().is_empty(),
            3 => self.draft.purpose.is_some() && !self.draft.goals.trim().is_empty(),
            4 => self.draft.image_style.is_some(),
            _ => false,
        }
    }

    /// Advances one step when the current step validates. Completing the
    /// final step finishes the wizard. Returns whether anything moved.
    pub fn next(&mut self) -> bool {
        if self.complete || !self.can_proceed() {
            return false;
        }
        if self.step < WIZARD_FINAL_STEP {
            self.step += 1;
        } else {
            self.complete = true;
        }
        true
    }

    pub fn back(&mut self) {
        if !self.complete && self.step > 1 {
            self.step -= 1;
        }
    }

    /// Finishes immediately with whatever the draft holds.
    pub fn skip(&mut self) {
        self.complete = true;
    }

    pub fn set_name(&mut self, name: &str) {
        if !self.complete {
            self.draft.name = name.trim().to_string();
        }
    }

    pub fn set_industry(&mut self, industry: Industry) {
        if !self.complete {
            self.draft.industry = Some(industry);
        }
    }

    pub fn set_niche(&mut self, niche: &str) {
        if !self.complete {
            self.draft.niche = niche.trim().to_string();
        }
    }

    pub fn set_purpose(&mut self, purpose: Purpose) {
        if !self.complete {
            self.draft.purpose = Some(purpose);
        }
    }

    pub fn set_goals(&mut self, goals: &str) {
        if !self.complete {
            self.draft.goals = goals.trim().to_string();
        }
    }

    pub fn set_image_style(&mut self, style: ImageStyle) {
        if !self.complete {
            self.draft.image_style = Some(style);
        }
    }

    /// Consumes the wizard and yields the (now immutable) profile.
    pub fn finish(self) -> UserProfile {
        self.draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_gate_on_required_fields() {
        let mut wizard = OnboardingWizard::new();
        assert_eq!(wizard.step(), 1);
        assert!(!wizard.next(), "blank name must not advance");

        wizard.set_name("  Ada  ");
        assert!(wizard.next());
        assert_eq!(wizard.step(), 2);

        wizard.set_industry(Industry::TechnologySoftware);
        assert!(!wizard.next(), "niche still blank");
        wizard.set_niche("SaaS startups");
        assert!(wizard.next());
        assert_eq!(wizard.step(), 3);

        wizard.set_purpose(Purpose::SocialMediaPosts);
        wizard.set_goals("grow engagement");
        assert!(wizard.next());
        assert_eq!(wizard.step(), 4);

        wizard.set_image_style(ImageStyle::Minimalist);
        assert!(wizard.next());
        assert!(wizard.is_complete());

        let profile = wizard.finish();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.industry, Some(Industry::TechnologySoftware));
        assert_eq!(profile.image_style, Some(ImageStyle::Minimalist));
    }

    #[test]
    fn back_stops_at_first_step() {
        let mut wizard = OnboardingWizard::new();
        wizard.back();
        assert_eq!(wizard.step(), 1);
        wizard.set_name("Ada");
        assert!(wizard.next());
        wizard.back();
        assert_eq!(wizard.step(), 1);
    }

    #[test]
    fn skip_freezes_an_empty_profile() {
        let mut wizard = OnboardingWizard::new();
        wizard.skip();
        assert!(wizard.is_complete());
        wizard.set_name("too late");
        let profile = wizard.finish();
        assert_eq!(profile, UserProfile::default());
    }

    #[test]
    fn labels_round_trip_through_serde() {
        let json = serde_json::to_string(&Industry::EcommerceRetail).unwrap();
        assert_eq!(json, "\"E-commerce & Retail\"");
        let parsed: Industry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Industry::EcommerceRetail);

        let style = serde_json::to_string(&ImageStyle::VintageRetro).unwrap();
        assert_eq!(style, "\"Vintage/Retro\"");
    }

    #[test]
    fn option_lists_match_label_order() {
        assert_eq!(Industry::ALL.len(), 12);
        assert_eq!(Purpose::ALL.len(), 10);
        assert_eq!(ImageStyle::ALL.len(), 10);
        assert_eq!(Industry::ALL[0].label(), "Marketing & Advertising");
        assert_eq!(Industry::ALL[11].label(), "Other");
        assert_eq!(ImageStyle::ALL[0].label(), "Photorealistic");
    }
}
