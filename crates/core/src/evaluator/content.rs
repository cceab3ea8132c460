//! Displayable content for derived results.

use super::facts::{
    DisabilityRating, Facts, MotherVeteranStatus, Relationship, SpouseSituation,
};
use super::{Analysis, Confidence};
use crate::constants::OPM_VET_GUIDE_URL;
use vpref_graph::{EligibilityResult, EligibilityType, ReferenceLink};

pub(super) fn build_result(analysis: &Analysis, facts: &Facts) -> EligibilityResult {
    let mut result = EligibilityResult::new(
        analysis.eligibility,
        title(analysis.eligibility),
        description(analysis.eligibility),
    );
    result.reasoning = reasoning(analysis, facts);
    result.required_documents = required_documents(analysis, facts);
    result.additional_info = additional_info(analysis, facts);
    for link in links(analysis, facts) {
        result.push_link(link);
    }
    result
}

fn title(eligibility: EligibilityType) -> &'static str {
    match eligibility {
        EligibilityType::Eligible5Point => "Eligible for 5-Point Preference (TP)",
        EligibilityType::Eligible10Point => "Eligible for 10-Point Preference (CP or XP)",
        EligibilityType::Eligible10PointCps => "Eligible for 10-Point Preference (CPS)",
        EligibilityType::Eligible10PointDerivative => {
            "Potentially Eligible for 10-Point Derivative Preference"
        }
        EligibilityType::NotEligible => "Not Eligible for Veterans' Preference",
        EligibilityType::Info => "Information Only",
        EligibilityType::Complex => "Veterans' Preference Eligibility",
    }
}

fn description(eligibility: EligibilityType) -> &'static str {
    match eligibility {
        EligibilityType::Eligible5Point => "Based on your qualifying military service and honorable discharge, you appear to be eligible for 5-point preference (TP).",
        EligibilityType::Eligible10Point => "Based on your service-connected disability, you appear to be eligible for 10-point preference (CP or XP).",
        EligibilityType::Eligible10PointCps => "Based on your 30% or more service-connected disability, you appear to be eligible for 10-point preference (CPS).",
        EligibilityType::Eligible10PointDerivative => "Based on your relationship to a qualifying veteran, you may be eligible for 10-point derivative preference.",
        EligibilityType::NotEligible => "Based on your answers, you do not appear to be eligible for Veterans' Preference at this time.",
        EligibilityType::Info => "This path provides general information or resources.",
        EligibilityType::Complex => "Review the reasoning below for details.",
    }
}

fn reasoning(analysis: &Analysis, facts: &Facts) -> Vec<String> {
    let mut lines = Vec::new();
    let checks = [
        ("Service qualification", "Service does not qualify", &analysis.service),
        ("Disability qualification", "Disability does not qualify", &analysis.disability),
        ("Derivative qualification", "Derivative status does not qualify", &analysis.derivative),
    ];

    match analysis.eligibility {
        eligibility if eligibility.is_eligible() => {
            for (met, _, check) in checks {
                if check.qualifies {
                    lines.push(format!("✓ {met}: {}", check.reason));
                }
            }
        }
        EligibilityType::NotEligible => {
            for (_, unmet, check) in checks {
                if !check.qualifies {
                    lines.push(format!("✗ {unmet}: {}", check.reason));
                }
            }
            if facts.discharge.is_some_and(|d| d.is_disqualifying()) {
                lines.push(
                    "✗ Discharge type is not honorable or general (under honorable conditions)."
                        .to_owned(),
                );
            }
            if analysis.retired_officer_without_disability {
                lines.push(
                    "✗ Retired officer (O-4 or above) without a service-connected disability."
                        .to_owned(),
                );
            }
        }
        EligibilityType::Info => lines.push(
            "This path provides general information and resources, not a preference eligibility determination."
                .to_owned(),
        ),
        _ => {}
    }

    if analysis.confidence == Confidence::Medium {
        lines.push(
            "! Some answers could not be interpreted. Please verify this result with an HR specialist."
                .to_owned(),
        );
    }

    if lines.is_empty() {
        lines.push("No specific reasoning available for this outcome.".to_owned());
    }
    lines
}

fn required_documents(analysis: &Analysis, facts: &Facts) -> Vec<String> {
    let mut docs = Vec::new();
    let eligibility = analysis.eligibility;
    if !eligibility.is_eligible() {
        return docs;
    }

    push_unique(&mut docs, "DD-214 or equivalent discharge documentation");
    if eligibility.is_ten_point() {
        push_unique(&mut docs, "SF-15 Application for 10-Point Veteran Preference");
    }

    match analysis.disability_rating {
        Some(DisabilityRating::ThirtyOrMore) => push_unique(
            &mut docs,
            "VA letter (dated within the last 12 months) confirming a service-connected disability rating of 30% or more.",
        ),
        Some(DisabilityRating::TenOrTwenty) => push_unique(
            &mut docs,
            "VA letter (dated within the last 12 months) confirming a 10% or 20% service-connected disability rating.",
        ),
        Some(DisabilityRating::ZeroOrPurpleHeart) => push_unique(
            &mut docs,
            "VA letter confirming a 0% service-connected disability rating, or a DD-214 showing the Purple Heart award.",
        ),
        Some(DisabilityRating::None) | None => {}
    }

    if analysis.derivative.qualifies {
        match facts.relationship {
            Some(Relationship::Spouse) => {
                push_unique(&mut docs, "Marriage certificate to the veteran.");
                match facts.spouse {
                    Some(SpouseSituation::LivingTotallyDisabled) => {
                        push_unique(&mut docs, "VA letter confirming veteran's 100% permanent and total service-connected disability OR unemployability (IU) status.");
                        push_unique(&mut docs, "Statement certifying the veteran is unemployed and unable to work in their usual occupation due to the disability.");
                    }
                    Some(SpouseSituation::DeceasedQualifying) => {
                        push_unique(&mut docs, "Veteran's death certificate.");
                        push_unique(
                            &mut docs,
                            "If death was service-connected, VA documentation confirming this.",
                        );
                        push_unique(&mut docs, "Statement certifying you have not remarried.");
                    }
                    _ => {}
                }
            }
            Some(Relationship::Mother) => {
                push_unique(
                    &mut docs,
                    "Your birth certificate (or veteran's showing you as mother).",
                );
                match facts.mother_veteran {
                    Some(MotherVeteranStatus::DiedInService) => {
                        push_unique(&mut docs, "Veteran's death certificate.");
                    }
                    Some(MotherVeteranStatus::TotallyDisabled) => {
                        push_unique(&mut docs, "VA letter confirming veteran's permanent and total service-connected disability.");
                    }
                    _ => {}
                }
                push_unique(&mut docs, "Marriage certificate to veteran's father; Death certificate/divorce decree for relevant spouse(s).");
            }
            _ => {}
        }
    }

    docs
}

fn additional_info(analysis: &Analysis, facts: &Facts) -> Vec<String> {
    let mut info = Vec::new();
    match analysis.eligibility {
        EligibilityType::NotEligible => {
            push_unique(
                &mut info,
                "Please review your answers or consult official OPM guidance for more details.",
            );
            if facts.discharge.is_some_and(|d| d.is_disqualifying()) {
                push_unique(
                    &mut info,
                    "You may be able to upgrade your discharge through a military discharge review board.",
                );
            }
        }
        EligibilityType::Info => {
            push_unique(&mut info, "Review the complete OPM Vet Guide for HR Professionals.");
            push_unique(&mut info, "Consult agency-specific policies.");
            push_unique(&mut info, "Contact OPM for specific case guidance.");
        }
        _ => {}
    }
    info
}

fn links(analysis: &Analysis, facts: &Facts) -> Vec<ReferenceLink> {
    let guide = |anchor: &str, text: &str| {
        ReferenceLink::new(format!("{OPM_VET_GUIDE_URL}{anchor}"), text)
    };

    let mut links = vec![guide("", "OPM Vet Guide for HR Professionals (Main)")];
    match analysis.eligibility {
        EligibilityType::Eligible5Point => {
            links.push(guide("#5pointtp", "5-Point Preference Information"));
        }
        EligibilityType::Eligible10PointDerivative => {
            links.push(guide("#10point", "General 10-Point Preference Information"));
            links.push(guide("#derivative", "Derivative Preference Information"));
        }
        eligibility if eligibility.is_ten_point() => {
            links.push(guide("#10point", "General 10-Point Preference Information"));
            match analysis.disability_rating {
                Some(DisabilityRating::ThirtyOrMore) => links.push(guide(
                    "#cps",
                    "10-Point (30% or more disabled) Preference (CPS)",
                )),
                Some(DisabilityRating::TenOrTwenty) => {
                    links.push(guide("#cp", "10-Point (Compensable) Preference (CP)"))
                }
                Some(DisabilityRating::ZeroOrPurpleHeart) => {
                    links.push(guide("#xp", "10-Point (Disability/XP) Preference"))
                }
                Some(DisabilityRating::None) | None => {}
            }
        }
        _ => {}
    }

    if facts.discharge.is_some_and(|d| d.is_disqualifying()) {
        links.push(guide("#discharge", "Character of Discharge Requirements"));
    }
    links
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_owned());
    }
}
