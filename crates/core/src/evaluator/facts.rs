//! Typed classification of recorded answer texts.
//!
//! Answers are stored as the label the user selected. Rules never compare labels directly; they
//! read the typed facts below, so copy edits to the labels only touch the classifiers.

use crate::navigation::AnswerRecord;
use vpref_graph::AnswerMap;
use vpref_types::NodeId;

pub(crate) const START: &str = "START";
pub(crate) const VETERAN_STATUS: &str = "VETERAN_STATUS";
pub(crate) const DISCHARGE_TYPE: &str = "DISCHARGE_TYPE";
pub(crate) const SERVICE_DATES: &str = "SERVICE_DATES";
pub(crate) const VERIFY_WARTIME_PERIOD: &str = "VERIFY_WARTIME_PERIOD";
pub(crate) const VERIFY_CAMPAIGN_MEDAL: &str = "VERIFY_CAMPAIGN_MEDAL";
pub(crate) const DISABILITY_STATUS_PEACETIME_CHECK: &str = "DISABILITY_STATUS_PEACETIME_CHECK";
pub(crate) const DISABILITY_STATUS: &str = "DISABILITY_STATUS";
pub(crate) const RETIREMENT_TYPE: &str = "RETIREMENT_TYPE";
pub(crate) const RETIRED_OFFICER_DISABILITY: &str = "RETIRED_OFFICER_DISABILITY";
pub(crate) const FAMILY_RELATIONSHIP: &str = "FAMILY_RELATIONSHIP";
pub(crate) const SPOUSE_ELIGIBILITY: &str = "SPOUSE_ELIGIBILITY";
pub(crate) const MOTHER_ELIGIBILITY: &str = "MOTHER_ELIGIBILITY";
pub(crate) const MOTHER_MARITAL_STATUS: &str = "MOTHER_MARITAL_STATUS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Purpose {
    Myself,
    FamilyMember,
    HrProfessional,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceStatus {
    Separated,
    ActiveDuty,
    Retired,
    ReserveOrGuard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discharge {
    Honorable,
    General,
    OtherThanHonorable,
    BadConductOrDishonorable,
    Uncharacterized,
}

impl Discharge {
    /// Discharges that rule out preference regardless of any other answer.
    pub fn is_disqualifying(self) -> bool {
        matches!(self, Self::OtherThanHonorable | Self::BadConductOrDishonorable)
    }

    /// Discharges under honorable conditions.
    pub fn is_honorable(self) -> bool {
        matches!(self, Self::Honorable | Self::General)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServicePeriod {
    Wartime,
    Campaign,
    Peacetime,
}

/// Answer to the peacetime follow-up question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeacetimeCheck {
    Disability,
    CampaignMedal,
    Neither,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisabilityRating {
    ThirtyOrMore,
    TenOrTwenty,
    ZeroOrPurpleHeart,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetirementRank {
    BelowO4,
    O4OrAbove,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relationship {
    Spouse,
    Mother,
    Child,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpouseSituation {
    LivingTotallyDisabled,
    LivingPartiallyDisabled,
    DeceasedQualifying,
    DeceasedNotQualifying,
    Remarried,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotherVeteranStatus {
    DiedInService,
    TotallyDisabled,
    NeitherApplies,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotherMaritalStatus {
    WidowedOrDivorced,
    MarriedToDisabledHusband,
    MarriedOther,
}

/// Everything the eligibility rules know about a session.
///
/// `None` means the question was not answered on this path, or its answer could not be
/// classified; the latter is also listed in `unclassified`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facts {
    pub purpose: Option<Purpose>,
    pub service_status: Option<ServiceStatus>,
    pub discharge: Option<Discharge>,
    pub service_period: Option<ServicePeriod>,
    pub wartime_verified: Option<bool>,
    pub campaign_medal: Option<bool>,
    pub peacetime_check: Option<PeacetimeCheck>,
    pub disability: Option<DisabilityRating>,
    pub retirement_rank: Option<RetirementRank>,
    pub officer_disabled: Option<bool>,
    pub relationship: Option<Relationship>,
    pub spouse: Option<SpouseSituation>,
    pub mother_veteran: Option<MotherVeteranStatus>,
    pub mother_marital: Option<MotherMaritalStatus>,
    /// Questions whose recorded answer matched no known label.
    pub unclassified: Vec<NodeId>,
}

impl Facts {
    /// Classifies an answer path. A question answered twice keeps its latest answer.
    pub fn from_path(path: &[AnswerRecord]) -> Self {
        let answers: AnswerMap = path
            .iter()
            .map(|record| (record.question_id.clone(), record.answer_text.clone()))
            .collect();
        Self::from_answers(&answers)
    }

    pub fn from_answers(answers: &AnswerMap) -> Self {
        let mut unclassified = Vec::new();
        let mut facts = Self::default();
        let u = &mut unclassified;

        facts.purpose = classify_answer(answers, START, u, purpose);
        facts.service_status = classify_answer(answers, VETERAN_STATUS, u, service_status);
        facts.discharge = classify_answer(answers, DISCHARGE_TYPE, u, discharge);
        facts.service_period = classify_answer(answers, SERVICE_DATES, u, service_period);
        facts.wartime_verified = classify_answer(answers, VERIFY_WARTIME_PERIOD, u, yes_no);
        facts.campaign_medal = classify_answer(answers, VERIFY_CAMPAIGN_MEDAL, u, yes_no);
        facts.peacetime_check =
            classify_answer(answers, DISABILITY_STATUS_PEACETIME_CHECK, u, peacetime_check);
        facts.disability = classify_answer(answers, DISABILITY_STATUS, u, disability);
        facts.retirement_rank = classify_answer(answers, RETIREMENT_TYPE, u, retirement_rank);
        facts.officer_disabled = classify_answer(answers, RETIRED_OFFICER_DISABILITY, u, yes_no);
        facts.relationship = classify_answer(answers, FAMILY_RELATIONSHIP, u, relationship);
        facts.spouse = classify_answer(answers, SPOUSE_ELIGIBILITY, u, spouse_situation);
        facts.mother_veteran = classify_answer(answers, MOTHER_ELIGIBILITY, u, mother_veteran);
        facts.mother_marital = classify_answer(answers, MOTHER_MARITAL_STATUS, u, mother_marital);

        facts.unclassified = unclassified;
        facts
    }

    /// True when the user answered as (or for) a family member rather than about their own service.
    pub fn is_family_path(&self) -> bool {
        self.purpose == Some(Purpose::FamilyMember) || self.relationship.is_some()
    }

    /// True when any answer describes the user's own service.
    pub fn has_own_service_answers(&self) -> bool {
        self.service_status.is_some() || self.discharge.is_some() || self.disability.is_some()
    }
}

fn classify_answer<T>(
    answers: &AnswerMap,
    question: &str,
    unclassified: &mut Vec<NodeId>,
    classify: fn(&str) -> Option<T>,
) -> Option<T> {
    let (id, answer) = answers.get_key_value(question)?;
    let normalized = answer.trim().to_lowercase();
    let value = classify(&normalized);
    if value.is_none() {
        unclassified.push(id.clone());
    }
    value
}

// ============================================================================
// Classifiers (input is trimmed and lowercased)
// ============================================================================

/// "no", "no, ...", "no to both." and "no va-rated ..." but not "not sure".
fn is_no(answer: &str) -> bool {
    answer
        .strip_prefix("no")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(&[' ', ',', '.'][..]))
}

fn yes_no(answer: &str) -> Option<bool> {
    if answer.starts_with("yes") {
        Some(true)
    } else if is_no(answer) {
        Some(false)
    } else {
        None
    }
}

fn purpose(answer: &str) -> Option<Purpose> {
    if answer.contains("hr professional") {
        Some(Purpose::HrProfessional)
    } else if answer.contains("family member") {
        Some(Purpose::FamilyMember)
    } else if answer.contains("myself") {
        Some(Purpose::Myself)
    } else {
        None
    }
}

fn service_status(answer: &str) -> Option<ServiceStatus> {
    if answer.contains("discharged") || answer.contains("separated") {
        Some(ServiceStatus::Separated)
    } else if answer.contains("active duty") {
        Some(ServiceStatus::ActiveDuty)
    } else if answer.contains("retired") {
        Some(ServiceStatus::Retired)
    } else if answer.contains("reserve") || answer.contains("national guard") {
        Some(ServiceStatus::ReserveOrGuard)
    } else {
        None
    }
}

fn discharge(answer: &str) -> Option<Discharge> {
    // "Other Than Honorable" contains "honorable", so it is checked first.
    if answer.contains("other than honorable") {
        Some(Discharge::OtherThanHonorable)
    } else if answer.contains("bad conduct") || answer.contains("dishonorable") {
        Some(Discharge::BadConductOrDishonorable)
    } else if answer.starts_with("honorable") {
        Some(Discharge::Honorable)
    } else if answer.starts_with("general") {
        Some(Discharge::General)
    } else if answer.starts_with("uncharacterized") || answer.contains("entry level") {
        Some(Discharge::Uncharacterized)
    } else {
        None
    }
}

fn service_period(answer: &str) -> Option<ServicePeriod> {
    // The peacetime label mentions campaign medals.
    if answer.contains("peacetime") {
        Some(ServicePeriod::Peacetime)
    } else if answer.contains("wartime") {
        Some(ServicePeriod::Wartime)
    } else if answer.contains("campaign") || answer.contains("expedition") {
        Some(ServicePeriod::Campaign)
    } else {
        None
    }
}

fn peacetime_check(answer: &str) -> Option<PeacetimeCheck> {
    if is_no(answer) {
        Some(PeacetimeCheck::Neither)
    } else if answer.contains("disability") {
        Some(PeacetimeCheck::Disability)
    } else if answer.contains("medal") {
        Some(PeacetimeCheck::CampaignMedal)
    } else {
        None
    }
}

fn disability(answer: &str) -> Option<DisabilityRating> {
    if is_no(answer) {
        Some(DisabilityRating::None)
    } else if answer.contains("30% or more") {
        Some(DisabilityRating::ThirtyOrMore)
    } else if answer.contains("10% or 20%") {
        Some(DisabilityRating::TenOrTwenty)
    } else if answer.contains("0%") || answer.contains("purple heart") {
        Some(DisabilityRating::ZeroOrPurpleHeart)
    } else {
        None
    }
}

fn retirement_rank(answer: &str) -> Option<RetirementRank> {
    if answer.contains("or above") {
        Some(RetirementRank::O4OrAbove)
    } else if answer.starts_with("below") {
        Some(RetirementRank::BelowO4)
    } else {
        None
    }
}

fn relationship(answer: &str) -> Option<Relationship> {
    if answer.contains("spouse") || answer.contains("widow") {
        Some(Relationship::Spouse)
    } else if answer.starts_with("mother") {
        Some(Relationship::Mother)
    } else if answer.starts_with("child") {
        Some(Relationship::Child)
    } else if answer.starts_with("other") {
        Some(Relationship::Other)
    } else {
        None
    }
}

fn spouse_situation(answer: &str) -> Option<SpouseSituation> {
    let deceased = answer.contains("deceased");
    let living = answer.contains("living");

    if answer.contains("remarried") && !answer.contains("unremarried") {
        Some(SpouseSituation::Remarried)
    } else if deceased && answer.contains("not service-connected") {
        Some(SpouseSituation::DeceasedNotQualifying)
    } else if deceased {
        Some(SpouseSituation::DeceasedQualifying)
    } else if living && (answer.contains("less than 100%") || answer.contains("does not prevent")) {
        Some(SpouseSituation::LivingPartiallyDisabled)
    } else if living && (answer.contains("permanently and totally") || answer.contains("100%")) {
        Some(SpouseSituation::LivingTotallyDisabled)
    } else if living {
        Some(SpouseSituation::LivingPartiallyDisabled)
    } else {
        None
    }
}

fn mother_veteran(answer: &str) -> Option<MotherVeteranStatus> {
    if answer.starts_with("none") {
        Some(MotherVeteranStatus::NeitherApplies)
    } else if answer.contains("died") {
        Some(MotherVeteranStatus::DiedInService)
    } else if answer.contains("permanent and total") {
        Some(MotherVeteranStatus::TotallyDisabled)
    } else {
        None
    }
}

fn mother_marital(answer: &str) -> Option<MotherMaritalStatus> {
    if answer.contains("widowed") || answer.contains("divorced") {
        Some(MotherMaritalStatus::WidowedOrDivorced)
    } else if answer.contains("not permanently") {
        Some(MotherMaritalStatus::MarriedOther)
    } else if answer.contains("permanently and totally disabled") {
        Some(MotherMaritalStatus::MarriedToDisabledHusband)
    } else if answer.contains("married") {
        Some(MotherMaritalStatus::MarriedOther)
    } else {
        None
    }
}
