//! Eligibility evaluation for deferred (`evaluate`) outcomes.
//!
//! Some outcomes depend on combinations of earlier answers (discharge, service period,
//! disability rating, family relationship) rather than on the last answer alone. The evaluator
//! derives a result from the whole answer path:
//!
//! 1. [`Facts::from_path`] classifies the recorded answer texts.
//! 2. [`analyze`] applies the eligibility rules and yields an [`Analysis`].
//! 3. The content module turns the analysis into a displayable [`EligibilityResult`].
//!
//! Everything here is a pure function of the answer texts. Timestamps are ignored.

mod content;
pub mod facts;

pub use facts::Facts;

use crate::navigation::AnswerRecord;
use facts::{
    DisabilityRating, MotherMaritalStatus, MotherVeteranStatus, PeacetimeCheck, Purpose,
    Relationship, RetirementRank, ServicePeriod, ServiceStatus, SpouseSituation,
};
use vpref_graph::{EligibilityResult, EligibilityType};

/// How much the analysis can be trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confidence {
    High,
    /// At least one consulted answer could not be classified.
    Medium,
}

/// Outcome of one qualification test, with the reason shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qualification {
    pub qualifies: bool,
    pub reason: &'static str,
}

impl Qualification {
    fn met(reason: &'static str) -> Self {
        Self {
            qualifies: true,
            reason,
        }
    }

    fn unmet(reason: &'static str) -> Self {
        Self {
            qualifies: false,
            reason,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    pub eligibility: EligibilityType,
    pub confidence: Confidence,
    pub service: Qualification,
    pub disability: Qualification,
    pub derivative: Qualification,
    /// The rating behind a disability-based category, if any.
    pub disability_rating: Option<DisabilityRating>,
    /// Set when the retired-officer rule decided the outcome.
    pub retired_officer_without_disability: bool,
}

impl Analysis {
    fn new(eligibility: EligibilityType, service: Qualification) -> Self {
        Self {
            eligibility,
            confidence: Confidence::High,
            service,
            disability: Qualification::unmet("No qualifying disability found."),
            derivative: Qualification::unmet("Not applicable or no derivative eligibility."),
            disability_rating: None,
            retired_officer_without_disability: false,
        }
    }
}

/// Derives the result for an answer path.
pub fn evaluate(path: &[AnswerRecord]) -> EligibilityResult {
    let facts = Facts::from_path(path);
    let analysis = analyze(&facts);
    content::build_result(&analysis, &facts)
}

/// Applies the eligibility rules, in order:
///
/// 1. An OTH, bad conduct or dishonorable discharge is never eligible, whatever else was answered.
/// 2. HR professionals get information only.
/// 3. Retired officers at O-4 or above without a disability are not eligible.
/// 4. Family members are judged on derivative preference only.
/// 5. Otherwise a disability rating decides the 10-point category, falling back to 5-point when
///    the service itself qualifies. A disabled veteran is never downgraded to 5-point.
pub fn analyze(facts: &Facts) -> Analysis {
    let mut analysis = analyze_rules(facts);
    if !facts.unclassified.is_empty() {
        analysis.confidence = Confidence::Medium;
    }
    analysis
}

fn analyze_rules(facts: &Facts) -> Analysis {
    if facts.discharge.is_some_and(|d| d.is_disqualifying()) {
        let mut analysis = Analysis::new(
            EligibilityType::NotEligible,
            Qualification::unmet("Discharge type does not qualify."),
        );
        analysis.disability = Qualification::unmet("N/A due to discharge type.");
        analysis.derivative = Qualification::unmet("N/A due to discharge type.");
        return analysis;
    }

    if facts.purpose == Some(Purpose::HrProfessional) {
        let mut analysis = Analysis::new(
            EligibilityType::Info,
            Qualification::unmet("N/A for HR info path."),
        );
        analysis.disability = Qualification::unmet("N/A for HR info path.");
        analysis.derivative = Qualification::unmet("N/A for HR info path.");
        return analysis;
    }

    if facts.service_status == Some(ServiceStatus::Retired)
        && facts.retirement_rank == Some(RetirementRank::O4OrAbove)
        && facts.officer_disabled == Some(false)
    {
        let mut analysis = Analysis::new(
            EligibilityType::NotEligible,
            Qualification::unmet(
                "Retired officers at O-4 or above qualify only as disabled veterans.",
            ),
        );
        analysis.retired_officer_without_disability = true;
        return analysis;
    }

    if facts.is_family_path() {
        return analyze_derivative(facts);
    }

    analyze_own_service(facts)
}

fn analyze_derivative(facts: &Facts) -> Analysis {
    let derivative = match facts.relationship {
        Some(Relationship::Spouse) => match facts.spouse {
            Some(SpouseSituation::LivingTotallyDisabled) => {
                Qualification::met("Spouse of 100% P&T disabled veteran.")
            }
            Some(SpouseSituation::DeceasedQualifying) => {
                Qualification::met("Unremarried widow(er) of qualifying deceased veteran.")
            }
            Some(SpouseSituation::LivingPartiallyDisabled) => Qualification::unmet(
                "The veteran's disability does not permanently and totally prevent employment.",
            ),
            Some(SpouseSituation::DeceasedNotQualifying) => Qualification::unmet(
                "The veteran's death was not service-connected and service was not in a qualifying period.",
            ),
            Some(SpouseSituation::Remarried) => {
                Qualification::unmet("Derivative preference ends on remarriage.")
            }
            None => Qualification::unmet("The veteran's situation was not provided."),
        },
        Some(Relationship::Mother) => {
            let veteran_qualifies = matches!(
                facts.mother_veteran,
                Some(MotherVeteranStatus::DiedInService | MotherVeteranStatus::TotallyDisabled)
            );
            let status_qualifies = matches!(
                facts.mother_marital,
                Some(
                    MotherMaritalStatus::WidowedOrDivorced
                        | MotherMaritalStatus::MarriedToDisabledHusband
                )
            );

            if veteran_qualifies && status_qualifies {
                Qualification::met(
                    "Mother of qualifying deceased or disabled veteran with appropriate marital status.",
                )
            } else if veteran_qualifies {
                Qualification::unmet("Marital status does not meet the requirements for mothers.")
            } else {
                Qualification::unmet("The veteran's status does not qualify a mother for preference.")
            }
        }
        Some(Relationship::Child) => {
            Qualification::unmet("Children of veterans are not eligible for derivative preference.")
        }
        Some(Relationship::Other) | None => Qualification::unmet(
            "Derivative preference is limited to spouses, widow(er)s and mothers.",
        ),
    };

    let eligibility = if derivative.qualifies {
        EligibilityType::Eligible10PointDerivative
    } else {
        EligibilityType::NotEligible
    };

    let mut analysis = Analysis::new(
        eligibility,
        Qualification::unmet("Preference is based on the veteran's service, not your own."),
    );
    analysis.derivative = derivative;
    analysis
}

fn analyze_own_service(facts: &Facts) -> Analysis {
    let honorable = facts.discharge.is_some_and(|d| d.is_honorable());
    let service = match facts.service_period {
        _ if !honorable => Qualification::unmet("No qualifying service found."),
        Some(ServicePeriod::Wartime) if facts.wartime_verified != Some(false) => {
            Qualification::met("Qualifying wartime or campaign service with honorable discharge.")
        }
        Some(ServicePeriod::Campaign) if facts.campaign_medal != Some(false) => {
            Qualification::met("Qualifying wartime or campaign service with honorable discharge.")
        }
        Some(ServicePeriod::Peacetime)
            if facts.peacetime_check == Some(PeacetimeCheck::CampaignMedal) =>
        {
            Qualification::met("Peacetime service with campaign medal.")
        }
        _ => Qualification::unmet("No qualifying service found."),
    };

    let (eligibility, disability) = match facts.disability {
        Some(DisabilityRating::ThirtyOrMore) => (
            EligibilityType::Eligible10PointCps,
            Qualification::met("VA-rated service-connected disability of 30% or more."),
        ),
        Some(DisabilityRating::TenOrTwenty) => (
            EligibilityType::Eligible10Point,
            Qualification::met("VA-rated service-connected disability of 10% or 20%."),
        ),
        Some(DisabilityRating::ZeroOrPurpleHeart) => (
            EligibilityType::Eligible10Point,
            Qualification::met("VA-rated service-connected disability of 0% or Purple Heart."),
        ),
        Some(DisabilityRating::None) | None if service.qualifies => (
            EligibilityType::Eligible5Point,
            Qualification::unmet("No qualifying disability found."),
        ),
        Some(DisabilityRating::None) | None => (
            EligibilityType::NotEligible,
            Qualification::unmet("No qualifying disability found."),
        ),
    };

    let mut analysis = Analysis::new(eligibility, service);
    if disability.qualifies {
        analysis.disability_rating = facts.disability;
    }
    analysis.disability = disability;
    analysis
}
