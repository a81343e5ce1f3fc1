use std::collections::HashSet;
use std::sync::LazyLock;

/// General English stopwords.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Words that show up in nearly every posting and say nothing about the job.
const POSTING_NOISE: &[&str] = &[
    // posting boilerplate
    "job", "work", "company", "description", "role", "team", "experience", "skills",
    "requirements", "years", "apply", "responsibilities", "looking", "jobs", "position",
    "opportunity", "candidate", "industry", "field", "type", "location", "join", "hire",
    "hiring", "please", "email", "contact", "website", "http", "https", "com", "www",
    // filler
    "ability", "including", "within", "across", "etc", "e.g", "i.e", "strong", "excellent",
    "good", "understanding", "knowledge", "level", "new", "use", "using", "used", "high",
    "quality", "various", "multiple", "day", "days", "time", "times", "year", "month", "months",
    "need", "needs", "required", "requirement", "skill",
    // pronouns and determiners
    "us", "either", "neither",
    // verbs
    "make", "makes", "made", "take", "takes", "took", "give", "gives", "gave", "get", "gets",
    "got", "want", "wants", "like", "likes", "prefer", "prefers",
];

/// Technical words too generic to be a skill.
const GENERIC_TECH: &[&str] = &[
    "system", "systems", "technology", "technologies", "process", "processes", "method",
    "methods", "way", "ways", "thing", "things", "part", "parts", "area", "areas", "aspect",
    "aspects", "component", "components",
];

/// Topical vocabulary deciding whether a term belongs to some line of work.
pub const JOB_CATEGORIES: &[&str] = &[
    "programming", "design", "marketing", "analysis", "engineering", "management",
    "development", "testing", "support", "administration", "finance", "accounting", "sales",
    "writing", "content", "education", "research", "science", "data", "security", "network",
    "cloud", "database", "web", "mobile", "graphics", "video", "audio", "architecture",
    "construction", "healthcare", "medical", "legal", "hr", "human resources", "recruiting",
    "customer", "service", "logistics", "supply chain", "manufacturing", "production",
    "cybersecurity", "artificial intelligence", "machine learning", "deep learning",
    "blockchain", "cryptocurrency", "biotechnology", "genetics", "pharmaceutical", "robotics",
    "automation", "environmental", "energy", "sustainability", "renewable energy",
    "social media", "public relations", "advertising", "brand management", "event planning",
    "hospitality", "tourism", "real estate", "interior design", "fashion", "retail",
    "e-commerce", "game development", "ui", "ux", "human-computer interaction", "aerospace",
    "automotive", "transportation", "marine", "quantitative analysis", "actuarial science",
    "investment", "venture capital", "private equity", "banking", "insurance",
    "legal compliance", "intellectual property", "regulatory affairs", "nonprofit", "ngo",
    "policy", "government", "public administration", "journalism", "publishing",
    "copywriting", "technical writing", "psychology", "counseling", "therapy", "coaching",
    "fitness", "sports management", "personal training", "nutrition", "veterinary",
    "agriculture", "forestry", "horticulture", "food science", "culinary", "restaurant",
    "catering", "film", "television", "broadcasting", "photography", "voice acting",
    "performing arts", "music", "theater", "museum", "archival", "history", "anthropology",
    "archaeology", "linguistics", "translation", "interpretation", "military",
    "law enforcement", "forensics", "intelligence", "emergency management", "firefighting",
    "paramedic", "aviation", "air traffic control", "meteorology",
];

/// Headings that usually open the skills part of a posting.
pub const DEFAULT_HEADING_KEYWORDS: &[&str] = &[
    "requirements",
    "skills",
    "qualifications",
    "what we're looking for",
    "key qualifications",
    "must-have",
    "responsibilities",
    "responsibility",
];

/// Technical skills looked for in resumes, grouped by area.
pub const TECHNICAL_SKILLS: &[(&str, &[&str])] = &[
    (
        "programming languages",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "php", "swift",
            "kotlin", "go", "rust", "scala", "perl", "r", "matlab", "bash", "powershell",
        ],
    ),
    (
        "web technologies",
        &[
            "html", "css", "react", "angular", "vue", "node.js", "express", "django", "flask",
            "spring", "bootstrap", "jquery", "sass", "less", "webpack", "graphql", "rest", "json",
            "xml", "nextjs", "svelte", "tailwind",
        ],
    ),
    (
        "databases",
        &[
            "sql", "mysql", "postgresql", "mongodb", "oracle", "sqlite", "redis", "cassandra",
            "dynamodb", "firebase", "neo4j", "elasticsearch", "couchdb", "mariadb",
        ],
    ),
    (
        "cloud and devops",
        &[
            "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "gitlab", "github actions",
            "terraform", "ansible", "chef", "puppet", "prometheus", "grafana", "ci/cd",
            "serverless",
        ],
    ),
    (
        "ai and data",
        &[
            "machine learning", "deep learning", "tensorflow", "pytorch", "scikit-learn",
            "pandas", "numpy", "matplotlib", "seaborn", "tableau", "power bi", "nlp",
            "computer vision", "data mining", "data analysis", "big data", "hadoop", "spark",
            "keras", "opencv",
        ],
    ),
];

pub const SOFT_SKILLS: &[&str] = &[
    "communication", "teamwork", "leadership", "problem solving", "time management",
    "critical thinking", "adaptability", "creativity", "emotional intelligence",
    "conflict resolution", "project management", "decision making", "negotiation",
    "presentation", "public speaking", "attention to detail", "customer service",
];

pub const CERTIFICATIONS: &[&str] = &[
    "aws certified", "azure certified", "comptia", "cisco ccna", "pmp", "scrum master",
    "google cloud certified", "oracle certified", "itil", "cissp", "ceh", "rhce",
    "salesforce certified", "microsoft certified", "cka", "google analytics",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ENGLISH_STOPWORDS
        .iter()
        .chain(POSTING_NOISE)
        .chain(GENERIC_TECH)
        .copied()
        .collect()
});

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// True when some category occurs inside `term`.
///
/// Two-letter categories (`hr`, `ui`, `ux`) only match the whole term, so
/// words like "through" or "build" are not counted as job-related.
/// True when `term` contains one of the job categories.
///
/// Categories of two letters or fewer must match the whole term instead of a
/// substring, so "through" is not `hr` and "build" is not `ui`.
pub fn is_job_related(term: &str) -> bool {
    let term = term.to_lowercase();
    JOB_CATEGORIES.iter().any(|category| {
        if category.len() <= 2 {
            term == *category
        } else {
            term.contains(category)
        }
    })
}

pub fn default_heading_keywords() -> Vec<String> {
    DEFAULT_HEADING_KEYWORDS.iter().map(|k| k.to_string()).collect()
}
