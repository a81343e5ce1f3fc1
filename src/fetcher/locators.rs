use reqwest::Url;

/// How a selector string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Css,
    XPath,
    Id,
    TagName,
}

/// One way of finding an element on a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: &'static str,
}

impl Locator {
    pub const fn css(selector: &'static str) -> Self {
        Self { strategy: Strategy::Css, selector }
    }

    pub const fn xpath(selector: &'static str) -> Self {
        Self { strategy: Strategy::XPath, selector }
    }

    pub const fn id(selector: &'static str) -> Self {
        Self { strategy: Strategy::Id, selector }
    }

    pub const fn tag(selector: &'static str) -> Self {
        Self { strategy: Strategy::TagName, selector }
    }

    /// `(using, value)` pair of a WebDriver find-element request.
    /// WebDriver has no id strategy, so ids become attribute selectors.
    pub fn to_webdriver(&self) -> (&'static str, String) {
        match self.strategy {
            Strategy::Css => ("css selector", self.selector.to_string()),
            Strategy::XPath => ("xpath", self.selector.to_string()),
            Strategy::Id => ("css selector", format!("[id=\"{}\"]", self.selector)),
            Strategy::TagName => ("tag name", self.selector.to_string()),
        }
    }
}

/// Locators for a job board, keyed by a fragment of its host name.
pub struct SiteRules {
    pub host: &'static str,
    pub title: &'static [Locator],
    pub body: &'static [Locator],
}

pub const SITES: &[SiteRules] = &[
    SiteRules {
        host: "linkedin.com",
        title: &[Locator::css(".job-details-jobs-unified-top-card__job-title")],
        body: &[Locator::css(".show-more-less-html__markup")],
    },
    SiteRules {
        host: "indeed.com",
        title: &[Locator::css(".jobsearch-JobInfoHeader-title")],
        body: &[Locator::id("jobDescriptionText")],
    },
    SiteRules {
        host: "glassdoor.com",
        title: &[Locator::css("[data-test='job-title']")],
        body: &[Locator::css(".jobDescriptionContent")],
    },
    SiteRules {
        host: "monster.com",
        title: &[Locator::css(".job-title h1")],
        body: &[Locator::css(".job-description")],
    },
    SiteRules {
        host: "unstop.com",
        title: &[Locator::tag("h1")],
        body: &[Locator::xpath(r#"//*[@id="tab-detail"]/div[1]/ul[1]"#)],
    },
    SiteRules {
        host: "internshala.com",
        title: &[Locator::css(".profile_on_detail_page")],
        body: &[Locator::css(".internship_details")],
    },
];

pub const GENERIC_TITLE: &[Locator] = &[
    Locator::css("h1.job-title"),
    Locator::css(".job-title"),
    Locator::css("h1.title"),
    Locator::xpath("//h1[contains(@class, 'title')]"),
    Locator::xpath("//h1[contains(text(), 'job') or contains(text(), 'position')]"),
];

pub const GENERIC_BODY: &[Locator] = &[
    Locator::css("div.job-description"),
    Locator::css(".description-container"),
    Locator::id("job-description"),
    Locator::xpath("//div[contains(@class, 'description')]"),
];

/// Ordered locators to try for one URL: site rules first, then generic ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePlan {
    pub title: Vec<Locator>,
    pub body: Vec<Locator>,
}

pub fn plan_for(url: &str) -> RulePlan {
    let site = host_of(url).and_then(|host| SITES.iter().find(|s| host.contains(s.host)));

    let mut title = Vec::new();
    let mut body = Vec::new();
    if let Some(site) = site {
        title.extend_from_slice(site.title);
        body.extend_from_slice(site.body);
    }
    title.extend_from_slice(GENERIC_TITLE);
    body.extend_from_slice(GENERIC_BODY);

    RulePlan { title, body }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
}
