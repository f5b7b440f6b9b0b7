//! Individual schemes scored against a patta holder's profile

use serde::{Deserialize, Serialize};

use crate::models::{HolderCategory, PattaDraft, PattaFields};

use super::{rank, Scored, DEFAULT_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Facts about a holder that a patta does not record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalInfo {
    #[serde(rename = "isBPL")]
    pub is_bpl: bool,
    pub has_bank_account: bool,
    pub family_members: Option<u32>,
    pub has_disabled_member: bool,
    pub is_widow: bool,
    pub is_single_mother: bool,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
}

/// Holder profile the individual rules are evaluated against
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualProfile {
    pub name: String,
    pub father_name: String,
    pub tribe: String,
    pub category: Option<HolderCategory>,

    pub village: String,
    pub district: String,
    pub state: String,

    /// `location.area.value` as recorded, unit not converted
    pub land_area: f64,
    pub has_forest_rights: bool,

    #[serde(rename = "isBPL")]
    pub is_bpl: bool,
    pub has_bank_account: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_members: Option<u32>,
    pub has_disabled_member: bool,
    pub is_widow: bool,
    pub is_single_mother: bool,

    #[serde(rename = "isSC")]
    pub is_sc: bool,
    #[serde(rename = "isST")]
    pub is_st: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

struct HolderFacts<'a> {
    name: &'a str,
    father_name: &'a str,
    tribe: &'a str,
    category: Option<HolderCategory>,
    village: &'a str,
    district: &'a str,
    state: &'a str,
    land_area: f64,
    rights: usize,
}

impl IndividualProfile {
    /// Profile of a stored patta holder
    pub fn from_patta(fields: &PattaFields, info: &AdditionalInfo) -> Self {
        Self::build(
            HolderFacts {
                name: &fields.holder.name,
                father_name: &fields.holder.father_name,
                tribe: &fields.holder.tribe,
                category: Some(fields.holder.category),
                village: &fields.location.village,
                district: &fields.location.district,
                state: &fields.location.state,
                land_area: fields.location.area.value,
                rights: fields.rights.len(),
            },
            info,
        )
    }

    /// Profile of an unsaved form; missing fields read as empty or zero
    pub fn from_draft(draft: &PattaDraft, info: &AdditionalInfo) -> Self {
        let holder = draft.holder.as_ref();
        let location = draft.location.as_ref();
        fn text(value: Option<&String>) -> &str {
            value.map(|s| s.trim()).unwrap_or_default()
        }

        Self::build(
            HolderFacts {
                name: text(holder.and_then(|h| h.name.as_ref())),
                father_name: text(holder.and_then(|h| h.father_name.as_ref())),
                tribe: text(holder.and_then(|h| h.tribe.as_ref())),
                category: holder
                    .and_then(|h| h.category.as_deref())
                    .and_then(HolderCategory::parse),
                village: text(location.and_then(|l| l.village.as_ref())),
                district: text(location.and_then(|l| l.district.as_ref())),
                state: text(location.and_then(|l| l.state.as_ref())),
                land_area: location
                    .and_then(|l| l.area.as_ref())
                    .and_then(|a| a.value)
                    .unwrap_or(0.0),
                rights: draft.rights.as_ref().map_or(0, Vec::len),
            },
            info,
        )
    }

    fn build(facts: HolderFacts<'_>, info: &AdditionalInfo) -> Self {
        Self {
            name: facts.name.to_string(),
            father_name: facts.father_name.to_string(),
            tribe: facts.tribe.to_string(),
            category: facts.category,
            village: facts.village.to_string(),
            district: facts.district.to_string(),
            state: facts.state.to_string(),
            land_area: facts.land_area,
            has_forest_rights: facts.rights > 0,
            is_bpl: info.is_bpl,
            has_bank_account: info.has_bank_account,
            family_members: info.family_members,
            has_disabled_member: info.has_disabled_member,
            is_widow: info.is_widow,
            is_single_mother: info.is_single_mother,
            // Neither allowed category is a Scheduled Caste
            is_sc: false,
            is_st: facts.category == Some(HolderCategory::ScheduledTribe),
            age: info.age,
            gender: info.gender,
        }
    }

    fn is_scheduled_tribe(&self) -> bool {
        self.category == Some(HolderCategory::ScheduledTribe)
    }

    fn large_family(&self) -> bool {
        self.family_members.is_some_and(|n| n > 5)
    }
}

type Rule<T> = fn(&IndividualProfile) -> T;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualScheme {
    pub id: &'static str,
    pub name: &'static str,
    pub ministry: &'static str,
    pub description: &'static str,
    pub benefits: &'static [&'static str],
    pub required_documents: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_link: Option<&'static str>,
    #[serde(skip)]
    eligibility: Rule<bool>,
    #[serde(skip)]
    priority: Rule<i64>,
}

impl std::fmt::Debug for IndividualScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndividualScheme").field("id", &self.id).finish()
    }
}

impl IndividualScheme {
    pub fn is_eligible(&self, profile: &IndividualProfile) -> bool {
        (self.eligibility)(profile)
    }

    pub fn priority(&self, profile: &IndividualProfile) -> i64 {
        (self.priority)(profile)
    }

    pub fn brief(&self) -> SchemeBrief {
        SchemeBrief {
            id: self.id,
            name: self.name,
            ministry: self.ministry,
            description: self.description,
            benefits: self.benefits,
            required_documents: self.required_documents,
        }
    }
}

/// Scheme summary attached to patta listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeBrief {
    pub id: &'static str,
    pub name: &'static str,
    pub ministry: &'static str,
    pub description: &'static str,
    pub benefits: &'static [&'static str],
    pub required_documents: &'static [&'static str],
}

fn either(cond: bool, yes: i64, no: i64) -> i64 {
    if cond {
        yes
    } else {
        no
    }
}

static SCHEMES: &[IndividualScheme] = &[
    IndividualScheme {
        id: "pm-kisan",
        name: "PM-KISAN",
        ministry: "Ministry of Agriculture & Farmers Welfare",
        description: "Income support of ₹6,000/year to small & marginal farmers",
        benefits: &["₹6,000 annual income support"],
        required_documents: &["Aadhaar Card", "Land Records (Patta)", "Bank Account Details", "Income Certificate"],
        apply_link: None,
        eligibility: |p| p.land_area > 0.0 && p.land_area <= 2.0,
        priority: |p| either(p.is_bpl, 100, 80) + either(p.is_scheduled_tribe(), 20, 0),
    },
    IndividualScheme {
        id: "pmay-g",
        name: "PMAY-G",
        ministry: "Ministry of Rural Development",
        description: "Housing for All - Rural (Pradhan Mantri Awas Yojana - Gramin)",
        benefits: &["Financial assistance of ₹1.20 lakh in plains/₹1.30 lakh in hilly areas"],
        required_documents: &["Aadhaar Card", "BPL Certificate", "Land Documents", "Affidavit for Landless"],
        apply_link: None,
        eligibility: |p| p.is_bpl && p.has_forest_rights,
        priority: |p| either(p.is_scheduled_tribe(), 100, 90) + either(p.is_bpl, 20, 0),
    },
    IndividualScheme {
        id: "kcc",
        name: "Kisan Credit Card (KCC)",
        ministry: "Ministry of Agriculture & Farmers Welfare",
        description: "Easy credit access for farmers at subsidized interest rates",
        benefits: &["Up to ₹3 lakh loan at 4% interest", "Insurance coverage", "Flexible repayment"],
        required_documents: &["Aadhaar Card", "Land Records", "Bank Account", "Passport Photo"],
        apply_link: None,
        eligibility: |p| p.land_area > 0.0,
        priority: |p| either(p.is_bpl, 95, 85) + either(p.is_scheduled_tribe(), 15, 0),
    },
    IndividualScheme {
        id: "pmfby",
        name: "PM Fasal Bima Yojana (PMFBY)",
        ministry: "Ministry of Agriculture & Farmers Welfare",
        description: "Crop insurance scheme for farmers",
        benefits: &["Premium as low as 1.5-5%", "Timely claim settlement", "Coverage for all crops"],
        required_documents: &["Aadhaar Card", "Land Records", "Bank Account Details", "Crop Details"],
        apply_link: None,
        eligibility: |p| p.land_area > 0.0,
        priority: |p| 90 + either(p.is_scheduled_tribe(), 15, 0),
    },
    IndividualScheme {
        id: "pmuy",
        name: "PMUY (Pradhan Mantri Ujjwala Yojana)",
        ministry: "Ministry of Petroleum & Natural Gas",
        description: "Free LPG connection for BPL households",
        benefits: &["Free LPG connection", "First refill and stove cost covered", "EMI facility for stove cost"],
        required_documents: &["Aadhaar Card", "BPL Certificate", "Ration Card", "Bank Account Details"],
        apply_link: None,
        eligibility: |p| p.is_bpl && p.has_bank_account,
        priority: |p| either(p.is_bpl, 100, 70) + either(p.large_family(), 20, 0),
    },
    IndividualScheme {
        id: "sukanya-samriddhi",
        name: "Sukanya Samriddhi Yojana",
        ministry: "Ministry of Women and Child Development",
        description: "Savings scheme for girl child",
        benefits: &["High interest rate", "Tax benefits", "Maturity after girl turns 21"],
        required_documents: &["Birth Certificate", "Aadhaar Card", "Address Proof", "Parents ID Proof"],
        apply_link: None,
        eligibility: |p| p.has_bank_account,
        priority: |p| either(p.is_scheduled_tribe(), 95, 85) + either(p.is_bpl, 15, 0),
    },
    IndividualScheme {
        id: "scholarship-st-sc",
        name: "Scholarships for ST/SC Students",
        ministry: "Ministry of Tribal Affairs / Social Justice",
        description: "Education support for ST/SC students",
        benefits: &["Tuition fee reimbursement", "Maintenance allowance", "Book grant"],
        required_documents: &["Caste Certificate", "Income Certificate", "Admission Proof", "Bank Account Details"],
        apply_link: None,
        eligibility: |p| p.is_scheduled_tribe() && p.has_bank_account,
        priority: |p| either(p.is_bpl, 100, 90) + either(p.large_family(), 20, 0),
    },
    IndividualScheme {
        id: "mudra",
        name: "Stand-Up India / Mudra Yojana",
        ministry: "Ministry of Finance",
        description: "Small business loans for SC/ST and women",
        benefits: &["Loan up to ₹10 lakh", "No collateral required", "Subsidized interest rates"],
        required_documents: &["Business Plan", "Identity Proof", "Address Proof", "Caste Certificate (if applicable)"],
        apply_link: None,
        eligibility: |p| p.has_bank_account,
        priority: |p| either(p.is_scheduled_tribe(), 100, 80) + either(p.is_bpl, 15, 0),
    },
    IndividualScheme {
        id: "van-dhan",
        name: "Van Dhan Yojana",
        ministry: "Ministry of Tribal Affairs",
        description: "Value addition to forest produce",
        benefits: &["Training in value addition", "Market linkage", "Infrastructure support"],
        required_documents: &["Aadhaar Card", "ST Certificate", "Bank Account Details", "Ration Card"],
        apply_link: None,
        eligibility: |p| p.is_scheduled_tribe() && p.has_forest_rights,
        priority: |p| 95 + either(p.is_bpl, 10, 0),
    },
    IndividualScheme {
        id: "pmsby",
        name: "PM Suraksha Bima Yojana",
        ministry: "Ministry of Finance",
        description: "Accident insurance (₹2 lakh)",
        benefits: &["₹2 lakh accidental death/disability cover", "Low premium (₹12/year)", "Auto-debit facility"],
        required_documents: &["Aadhaar Card", "Bank Account Details", "Nominee Details"],
        apply_link: None,
        eligibility: |p| p.age.is_some_and(|age| (18..=70).contains(&age)) && p.has_bank_account,
        priority: |p| {
            let base = match p.age {
                Some(age) if age > 0 => 70 - (i64::from(age) - 18),
                _ => 50,
            };
            base + either(p.is_bpl, 20, 0)
        },
    },
    IndividualScheme {
        id: "pre-matric-scholarship",
        name: "Pre-Matric Scholarship for ST Students",
        ministry: "Ministry of Tribal Affairs",
        description: "Scholarship for ST students studying in classes 9 and 10",
        benefits: &["Maintenance allowance", "Admission fee", "Tuition fee", "Other charges"],
        required_documents: &["Aadhaar Card", "Caste Certificate", "Income Certificate", "Bank Account Details"],
        apply_link: None,
        eligibility: |p| p.is_scheduled_tribe() && p.is_bpl,
        priority: |p| either(p.is_bpl, 100, 90),
    },
];

/// The full individual rule table
pub fn catalog() -> &'static [IndividualScheme] {
    SCHEMES
}

pub fn find(id: &str) -> Option<&'static IndividualScheme> {
    SCHEMES.iter().find(|scheme| scheme.id == id)
}

pub fn recommend(profile: &IndividualProfile, limit: usize) -> Vec<Scored<'static, IndividualScheme>> {
    rank(
        SCHEMES,
        profile,
        |scheme, p| scheme.is_eligible(p),
        |scheme, p| scheme.priority(p),
        limit,
    )
}

pub fn recommend_default(profile: &IndividualProfile) -> Vec<Scored<'static, IndividualScheme>> {
    recommend(profile, DEFAULT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(land_area: f64, rights: bool, category: Option<HolderCategory>, info: AdditionalInfo) -> IndividualProfile {
        IndividualProfile::build(
            HolderFacts {
                name: "Rajesh Kumar",
                father_name: "Suresh Kumar",
                tribe: "Gond",
                category,
                village: "Bichhiya",
                district: "Mandla",
                state: "Madhya Pradesh",
                land_area,
                rights: usize::from(rights),
            },
            &info,
        )
    }

    fn ids(recs: &[Scored<'static, IndividualScheme>]) -> Vec<&'static str> {
        recs.iter().map(|s| s.scheme.id).collect()
    }

    #[test]
    fn test_catalog() {
        assert_eq!(catalog().len(), 11);
        assert!(find("pm-kisan").is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_default_profile_only_land_schemes() {
        let p = profile(2.5, true, Some(HolderCategory::ScheduledTribe), AdditionalInfo::default());
        let recs = recommend_default(&p);
        // 2.5 exceeds the PM-KISAN ceiling; KCC and PMFBY only need land
        assert_eq!(ids(&recs), vec!["pmfby", "kcc", "van-dhan"]);
        assert_eq!(recs[0].score, 105);
        assert_eq!(recs[1].score, 100);
        assert_eq!(recs[2].score, 95);
    }

    #[test]
    fn test_pm_kisan_bounds() {
        let small = profile(2.0, false, None, AdditionalInfo::default());
        assert!(ids(&recommend(&small, 11)).contains(&"pm-kisan"));

        let none = profile(0.0, false, None, AdditionalInfo::default());
        assert!(recommend(&none, 11).is_empty());
    }

    #[test]
    fn test_bpl_with_bank_account() {
        let info = AdditionalInfo {
            is_bpl: true,
            has_bank_account: true,
            family_members: Some(6),
            age: Some(30),
            ..Default::default()
        };
        let p = profile(1.0, true, Some(HolderCategory::ScheduledTribe), info);
        let recs = recommend(&p, 11);
        assert_eq!(recs.len(), 11);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));

        let score = |id: &str| recs.iter().find(|s| s.scheme.id == id).unwrap().score;
        assert_eq!(score("pm-kisan"), 120);
        assert_eq!(score("pmay-g"), 120);
        assert_eq!(score("pmuy"), 120);
        assert_eq!(score("scholarship-st-sc"), 120);
        assert_eq!(score("pmsby"), 78);
        assert_eq!(score("pre-matric-scholarship"), 100);
    }

    #[test]
    fn test_pmsby_age_window() {
        let mut info = AdditionalInfo {
            has_bank_account: true,
            age: Some(71),
            ..Default::default()
        };
        let p = profile(0.0, false, None, info.clone());
        assert!(!ids(&recommend(&p, 11)).contains(&"pmsby"));

        info.age = Some(70);
        let p = profile(0.0, false, None, info);
        let recs = recommend(&p, 11);
        let pmsby = recs.iter().find(|s| s.scheme.id == "pmsby").unwrap();
        assert_eq!(pmsby.score, 18);
    }

    #[test]
    fn test_profile_from_draft() {
        let draft: PattaDraft = serde_json::from_value(json!({
            "holder": { "name": " Asha ", "category": "Other Traditional Forest Dweller" },
            "location": { "state": "Odisha", "area": { "value": 1.5 } },
            "rights": ["", "Right to cultivate"]
        }))
        .unwrap();
        let info: AdditionalInfo = serde_json::from_value(json!({ "isBPL": true })).unwrap();

        let p = IndividualProfile::from_draft(&draft, &info);
        assert_eq!(p.name, "Asha");
        assert_eq!(p.category, Some(HolderCategory::OtherTraditionalForestDweller));
        assert!(!p.is_st);
        assert!(p.has_forest_rights);
        assert!(p.is_bpl);
        assert_eq!(p.land_area, 1.5);
        assert_eq!(p.father_name, "");

        let blank: PattaDraft = serde_json::from_value(json!({ "rights": [""] })).unwrap();
        assert!(IndividualProfile::from_draft(&blank, &AdditionalInfo::default()).has_forest_rights);
        let none: PattaDraft = serde_json::from_value(json!({ "rights": [] })).unwrap();
        assert!(!IndividualProfile::from_draft(&none, &AdditionalInfo::default()).has_forest_rights);

        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["isBPL"], true);
        assert_eq!(value["landArea"], 1.5);
        assert_eq!(value["category"], "Other Traditional Forest Dweller");
    }

    #[test]
    fn test_brief_shape() {
        let value = serde_json::to_value(find("kcc").unwrap().brief()).unwrap();
        assert_eq!(value["requiredDocuments"][0], "Aadhaar Card");
        assert!(value.get("score").is_none());
    }
}
