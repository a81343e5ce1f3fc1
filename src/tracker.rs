use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Where an application stands, as read from a recruiter email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    OfferReceived,
    Rejected,
    Selected,
    InterviewInvitation,
    TechnicalAssessment,
    PhoneScreening,
    ApplicationReceived,
    OnHold,
    ApplicationSubmitted,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::OfferReceived => "Offer Received",
            Self::Rejected => "Rejected",
            Self::Selected => "Selected",
            Self::InterviewInvitation => "Interview Invitation",
            Self::TechnicalAssessment => "Technical Assessment",
            Self::PhoneScreening => "Phone Screening",
            Self::ApplicationReceived => "Application Received",
            Self::OnHold => "On Hold",
            Self::ApplicationSubmitted => "Application Submitted",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First matching rule wins. Rejections are checked before "selected" so
/// "not selected" and "unsuccessful" are not read as good news.
static STATUS_RULES: LazyLock<Vec<(Regex, ApplicationStatus)>> = LazyLock::new(|| {
    [
        (r"offer\s+letter|job\s+offer|employment\s+offer", ApplicationStatus::OfferReceived),
        (
            r"reject|regret|not\s+selected|not\s+moving\s+forward|unsuccessful",
            ApplicationStatus::Rejected,
        ),
        (r"\b(?:congratulations|selected|successful)\b", ApplicationStatus::Selected),
        (
            r"interview\s+invite|schedule\s+(?:an|your)\s+interview",
            ApplicationStatus::InterviewInvitation,
        ),
        (
            r"technical\s+(?:interview|assessment|challenge)",
            ApplicationStatus::TechnicalAssessment,
        ),
        (r"phone\s+(?:interview|screen|call)", ApplicationStatus::PhoneScreening),
        (r"application\s+(?:received|confirmed)", ApplicationStatus::ApplicationReceived),
        (r"on\s+hold|pause", ApplicationStatus::OnHold),
    ]
    .into_iter()
    .map(|(pattern, status)| (Regex::new(&format!("(?i){pattern}")).unwrap(), status))
    .collect()
});

/// Specific titles come before the generic ones they contain.
const JOB_ROLES: &[&str] = &[
    "Full Stack Developer",
    "Frontend Developer",
    "Backend Developer",
    "Website Developer",
    "Software Engineer",
    "Data Scientist",
    "Data Analyst",
    "Business Analyst",
    "Summer Analyst",
    "AI Researcher",
    "Developer",
    "Designer",
    "Manager",
    "Consultant",
    "Intern",
];

const KNOWN_COMPANIES: &[&str] = &[
    "Agron Remedies Private Limited",
    "Sea",
    "Google",
    "Goldman Sachs",
    "SIP Check",
    "Latracal Solutions Pvt Ltd",
    "CBIT Open Source Community",
    "Girl Hackathon",
    "My Peoples Card",
];

/// Sender domains that relay mail for many employers.
const RELAY_DOMAINS: &[&str] = &[
    "linkedin", "unstop", "naukri", "instahyre", "foundit", "indeed", "gmail", "hotmail",
    "yahoo", "outlook", "mail",
];

const COMPANY_NAME: &str = r"([A-Za-z0-9\s&]+(?:Private\s+Limited|Pvt\s+Ltd\.|Ltd\.|Inc\.)?)";

static SENDER_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@([^>]+)").unwrap());

static BODY_COMPANY_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bat\s+",
        r"\bfrom\s+",
        r"\bjoin(?:ing)?\s+",
        r"\bopportunity\s+at\s+",
        r"\bcareer\s+with\s+",
        r"\binternship\s+at\s+",
    ]
    .iter()
    .map(|lead| Regex::new(&format!("(?i){lead}{COMPANY_NAME}")).unwrap())
    .collect()
});

static SUBJECT_COMPANY_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"\bfrom\s+{COMPANY_NAME}"),
        format!(r"\bat\s+{COMPANY_NAME}"),
        format!(r"\bwith\s+{COMPANY_NAME}"),
        format!(r"{COMPANY_NAME}\s+job"),
        format!(r"{COMPANY_NAME}\s+application"),
        format!(r"{COMPANY_NAME}\s+careers"),
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

/// The parts of a recruiter email the classifier reads.
#[derive(Debug, Clone, Default)]
pub struct ApplicationEmail {
    pub sender: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub company: Option<String>,
    pub role: Option<&'static str>,
    pub status: ApplicationStatus,
}

pub fn classify(email: &ApplicationEmail) -> Application {
    Application {
        company: extract_company(&email.sender, &email.subject, &email.body),
        role: extract_role(&email.subject, &email.body),
        status: determine_status(&email.body, &email.subject),
    }
}

/// Status from the first rule matching body or subject. Emails matching no
/// rule are plain submissions.
pub fn determine_status(body: &str, subject: &str) -> ApplicationStatus {
    let text = format!("{body} {subject}");
    STATUS_RULES
        .iter()
        .find(|(re, _)| re.is_match(&text))
        .map(|(_, status)| *status)
        .unwrap_or(ApplicationStatus::ApplicationSubmitted)
}

/// First known role named in the subject, then in the body.
pub fn extract_role(subject: &str, body: &str) -> Option<&'static str> {
    let subject = subject.to_lowercase();
    let body = body.to_lowercase();
    JOB_ROLES.iter().copied().find(|role| {
        let role = role.to_lowercase();
        subject.contains(&role) || body.contains(&role)
    })
}

/// Company behind an email: a known name in the body, else the sender's own
/// domain, else phrases like "at Acme" in the body and then the subject.
pub fn extract_company(sender: &str, subject: &str, body: &str) -> Option<String> {
    let lowered = body.to_lowercase();
    if let Some(known) = KNOWN_COMPANIES
        .iter()
        .find(|c| lowered.contains(&c.to_lowercase()))
    {
        return Some(known.to_string());
    }

    if let Some(caps) = SENDER_DOMAIN_RE.captures(sender) {
        let domain = caps[1].split('.').next().unwrap_or_default().to_lowercase();
        if !domain.is_empty() && !RELAY_DOMAINS.contains(&domain.as_str()) {
            return Some(title_case(&domain));
        }
    }

    first_capture(&BODY_COMPANY_RES, body)
        .or_else(|| first_capture(&SUBJECT_COMPANY_RES, subject))
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        let name = re.captures(text)?.get(1)?.as_str().trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// "acme-corp" -> "Acme-Corp"
fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut start = true;
    for c in word.chars() {
        if start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        start = !c.is_alphabetic();
    }
    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_rules_are_ordered() {
        assert_eq!(
            determine_status("Please find your offer letter attached. Congratulations!", ""),
            ApplicationStatus::OfferReceived
        );
        assert_eq!(
            determine_status("Congratulations, you have been selected for the next round.", ""),
            ApplicationStatus::Selected
        );
        assert_eq!(
            determine_status("We regret to inform you that you were not selected.", ""),
            ApplicationStatus::Rejected
        );
        assert_eq!(
            determine_status("", "Your application was unsuccessful"),
            ApplicationStatus::Rejected
        );
        assert_eq!(
            determine_status("We'd like to schedule an interview with you.", "Next steps"),
            ApplicationStatus::InterviewInvitation
        );
        assert_eq!(
            determine_status("", "Technical Assessment for Backend Developer"),
            ApplicationStatus::TechnicalAssessment
        );
        assert_eq!(
            determine_status("", "Application received - Data Analyst"),
            ApplicationStatus::ApplicationReceived
        );
        assert_eq!(
            determine_status("Thanks for applying.", "Your application"),
            ApplicationStatus::ApplicationSubmitted
        );
    }

    #[test]
    fn specific_roles_win_over_generic_ones() {
        assert_eq!(
            extract_role("Frontend Developer role at Acme", ""),
            Some("Frontend Developer")
        );
        assert_eq!(extract_role("Hello", "We are hiring an intern."), Some("Intern"));
        assert_eq!(extract_role("Hello", "Thanks"), None);
    }

    #[test]
    fn company_from_known_names_then_sender() {
        assert_eq!(
            extract_company("jobs@acme.io", "", "Your Goldman Sachs application"),
            Some("Goldman Sachs".to_string())
        );
        assert_eq!(
            extract_company("Recruiting <talent@acme-corp.com>", "Update", "Thanks."),
            Some("Acme-Corp".to_string())
        );
    }

    #[test]
    fn relay_senders_fall_back_to_phrases() {
        let body = "Your internship at Initech Ltd. starts soon";
        assert_eq!(
            extract_company("jobs-noreply@linkedin.com", "", body),
            Some("Initech Ltd".to_string())
        );
        assert_eq!(
            extract_company("someone@gmail.com", "Update from Globex", "Hi,"),
            Some("Globex".to_string())
        );
        assert_eq!(extract_company("someone@gmail.com", "Hi", "Thanks."), None);
    }

    #[test]
    fn classify_combines_fields() {
        let email = ApplicationEmail {
            sender: "careers@initech.com".into(),
            subject: "Phone screen - Software Engineer".into(),
            body: "Let's set up a phone call next week.".into(),
        };
        assert_eq!(
            classify(&email),
            Application {
                company: Some("Initech".into()),
                role: Some("Software Engineer"),
                status: ApplicationStatus::PhoneScreening,
            }
        );
        assert_eq!(ApplicationStatus::PhoneScreening.to_string(), "Phone Screening");
    }
}
