//! Static lookup tables for query expansion and relevance scoring.
//!
//! Table order is significant: translation lookup and domain classification stop at the first
//! entry that matches.

#[derive(Debug)]
pub struct Translation {
	pub term: &'static str,
	pub variants: &'static [&'static str],
}

#[derive(Debug)]
pub struct DomainExpansion {
	pub domain: Domain,
	pub triggers: &'static [&'static str],
	pub phrases: &'static [&'static str],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
	Software,
	Data,
	Nursing,
	Management,
	Sales,
}

macro_rules! translations {
	($($term:literal => [$($variant:literal),+ $(,)?]),+ $(,)?) => {
		&[$(Translation { term: $term, variants: &[$($variant),+] }),+]
	};
}

/// English and German professional vocabulary, both directions.
pub const TRANSLATIONS: &[Translation] = translations![
	"developer" => ["entwickler", "programmierer", "software engineer", "coder", "dev", "entwicklung"],
	"entwickler" => ["developer", "programmer", "software engineer", "coder", "dev"],
	"engineer" => ["ingenieur", "entwickler", "techniker", "eng"],
	"ingenieur" => ["engineer", "developer", "technician", "technical specialist"],
	"software" => ["software", "anwendung", "programm", "app", "application"],
	"programmer" => ["programmierer", "entwickler", "coder", "coding"],
	"programmierer" => ["programmer", "developer", "coder", "software engineer"],
	"coding" => ["programmierung", "entwicklung", "programming"],
	"programmierung" => ["coding", "programming", "development"],
	"frontend" => ["frontend", "front-end", "ui", "user interface", "client-side", "vorderseite"],
	"backend" => ["backend", "back-end", "server-side", "api", "serverseite"],
	"fullstack" => ["full-stack", "vollstack", "full stack", "end-to-end"],
	"full stack" => ["fullstack", "vollstack", "frontend backend", "complete stack"],
	"ui" => ["benutzeroberfläche", "user interface", "interface"],
	"ux" => ["benutzererfahrung", "user experience", "usability"],
	"python" => ["python", "django", "flask", "fastapi", "pandas", "numpy"],
	"javascript" => ["javascript", "js", "node", "react", "vue", "angular", "typescript"],
	"java" => ["java", "spring", "hibernate", "maven", "gradle"],
	"web" => ["web", "website", "internet", "online", "webseite"],
	"react" => ["react", "reactjs", "react.js"],
	"node" => ["nodejs", "node.js", "express"],
	"database" => ["datenbank", "db", "sql", "mysql", "postgresql"],
	"datenbank" => ["database", "db", "data storage"],
	"ai" => ["artificial intelligence", "künstliche intelligenz", "ki", "machine learning"],
	"ml" => ["machine learning", "maschinelles lernen", "ai", "artificial intelligence"],
	"data scientist" => ["datenwissenschaftler", "data analyst", "analyst", "data researcher"],
	"analyst" => ["analytiker", "data analyst", "business analyst", "researcher"],
	"datenwissenschaftler" => ["data scientist", "data analyst", "data researcher"],
	"data" => ["daten", "data analysis", "analytics", "information"],
	"daten" => ["data", "information", "analytics"],
	"analytics" => ["analytik", "analysis", "datenanalyse"],
	"manager" => ["manager", "leiter", "führungskraft", "teamleiter", "direktor"],
	"leiter" => ["manager", "leader", "head", "director", "supervisor"],
	"teamleiter" => ["team leader", "team manager", "lead", "supervisor"],
	"project manager" => ["projektmanager", "project lead", "pm"],
	"projektmanager" => ["project manager", "project lead", "pm"],
	"director" => ["direktor", "leiter", "head"],
	"direktor" => ["director", "head", "manager"],
	"nurse" => ["krankenschwester", "krankenpfleger", "pflegekraft", "schwester", "pfleger"],
	"krankenschwester" => ["nurse", "healthcare worker", "medical professional"],
	"pflegekraft" => ["nurse", "caregiver", "healthcare worker", "care professional"],
	"pfleger" => ["nurse", "caregiver", "male nurse"],
	"medical" => ["medizinisch", "healthcare", "gesundheitswesen"],
	"healthcare" => ["gesundheitswesen", "medical", "medizin"],
	"study nurse" => ["study nurse", "studienassistenz", "klinische forschung"],
	"sales" => ["verkauf", "vertrieb", "verkäufer", "sales representative"],
	"verkauf" => ["sales", "selling", "commerce"],
	"vertrieb" => ["sales", "distribution", "business development"],
	"marketing" => ["marketing", "werbung", "promotion"],
	"werbung" => ["marketing", "advertising", "promotion"],
	"business development" => ["geschäftsentwicklung", "business dev", "bd"],
	"junior" => ["junior", "einsteiger", "entry level", "beginner", "anfänger"],
	"einsteiger" => ["junior", "entry level", "beginner", "starter"],
	"senior" => ["senior", "erfahren", "lead", "experienced", "expert"],
	"erfahren" => ["senior", "experienced", "expert", "advanced"],
	"lead" => ["lead", "leader", "principal", "hauptentwickler"],
	"principal" => ["principal", "senior", "expert", "chief"],
	"internship" => ["praktikum", "intern", "trainee", "stage"],
	"praktikum" => ["internship", "intern", "trainee", "apprenticeship"],
	"trainee" => ["trainee", "praktikant", "auszubildender"],
	"remote" => ["remote", "homeoffice", "telearbeit", "distant"],
	"hybrid" => ["hybrid", "teilweise remote", "mixed"],
	"consultant" => ["berater", "consulting", "beratung"],
	"berater" => ["consultant", "advisor", "consulting"],
	"architect" => ["architekt", "system architect", "solution architect"],
	"architekt" => ["architect", "designer", "planner"],
	"devops" => ["devops", "dev ops", "operations", "deployment"],
	"qa" => ["quality assurance", "testing", "qualitätssicherung", "tester"],
	"testing" => ["testing", "qa", "qualitätssicherung", "software testing"],
];

/// Tried in order; the first domain with a matching trigger contributes its phrases.
pub const DOMAIN_EXPANSIONS: &[DomainExpansion] = &[
	DomainExpansion {
		domain: Domain::Software,
		triggers: &["software", "developer", "entwickler", "engineer", "programming", "coding"],
		phrases: &[
			"software development programming coding",
			"web application mobile development",
			"python javascript java react nodejs",
			"frontend backend fullstack development",
			"software engineer developer programmer",
			"entwicklung programmierung software engineer",
		],
	},
	DomainExpansion {
		domain: Domain::Data,
		triggers: &["data", "analyst", "analytics", "datenwissenschaft"],
		phrases: &[
			"data analysis analytics python sql",
			"machine learning artificial intelligence",
			"business intelligence reporting dashboard",
			"data scientist analyst researcher",
			"datenanalyst datenwissenschaftler analytics",
		],
	},
	DomainExpansion {
		domain: Domain::Nursing,
		triggers: &["nurse", "nursing", "pflege", "krankenschwester", "medical"],
		phrases: &[
			"healthcare medical nursing patient care",
			"hospital clinic healthcare worker",
			"registered nurse healthcare professional",
			"krankenpflege medizinische versorgung",
			"pflegekraft krankenschwester pfleger",
		],
	},
	DomainExpansion {
		domain: Domain::Management,
		triggers: &["manager", "management", "leiter", "führung"],
		phrases: &[
			"management leadership team supervisor",
			"project manager team leader director",
			"business management executive leadership",
			"teamleitung projektmanagement führung",
			"manager leiter direktor führungskraft",
		],
	},
	DomainExpansion {
		domain: Domain::Sales,
		triggers: &["sales", "verkauf", "vertrieb"],
		phrases: &[
			"sales business development account manager",
			"customer relationship sales representative",
			"verkauf vertrieb kundenbetreuung",
			"business development sales manager",
		],
	},
];

/// Suffixes appended to the raw title when no domain matches.
pub const GENERIC_SUFFIXES: &[&str] =
	&["position job role work", "career opportunity employment", "stelle arbeit beruf"];

/// Query terms that mark a search as technical.
pub const TECH_QUERY_TERMS: &[&str] = &[
	"software",
	"developer",
	"engineer",
	"programmer",
	"python",
	"javascript",
	"react",
	"frontend",
	"backend",
	"fullstack",
	"web developer",
	"data scientist",
	"machine learning",
	"ai",
	"cloud",
	"entwickler",
];

/// Titles that read as non-technical management.
pub const MANAGEMENT_TITLES: &[&str] = &[
	"sales manager",
	"marketing manager",
	"strategy director",
	"business manager",
	"account manager",
	"hr manager",
	"facilities manager",
	"operations manager",
];

pub const DATA_SCIENCE_QUERY_TERMS: &[&str] = &["data scientist", "data science"];

/// Titles that collide with a data science search.
pub const DATA_SCIENCE_DENYLIST: &[&str] = &[
	"strategy consultant",
	"strategy director",
	"business consultant",
	"information technology specialist",
	"head of information technology",
	"chief information officer",
	"it administrator",
	"it-administrator",
	"head of it service",
	"senior manager",
	"operations analyst",
	"analytical consultant",
	"senior consultant",
];

pub const NURSING_QUERY_TERMS: &[&str] = &["nurse"];

pub const TECH_TITLE_TERMS: &[&str] = &["software", "developer", "engineer", "programmer"];

pub const AI_QUERY_TERMS: &[&str] = &["ai"];

pub const AI_DENYLIST: &[&str] =
	&["facilities manager", "senior manager", "operations manager", "sales manager"];

pub const TECH_STACK: &[&str] = &[
	"python",
	"javascript",
	"java",
	"react",
	"node",
	"angular",
	"vue",
	"sql",
	"docker",
	"kubernetes",
	"aws",
	"azure",
];

pub const INTERNSHIP_QUERY_TERMS: &[&str] = &["intern", "praktikum", "trainee"];

pub const INTERNSHIP_WORK_TYPE: &str = "intern";

/// Title keywords counted by the store statistics endpoint.
pub const SOFTWARE_TITLE_KEYWORDS: &[&str] =
	&["software", "developer", "engineer", "programming", "coding", "dev", "tech"];

/// First translation entry whose term occurs in the lower-cased query.
pub fn find_translation(query_lower: &str) -> Option<&'static Translation> {
	TRANSLATIONS.iter().find(|entry| crate::text::contains_term(query_lower, entry.term))
}

/// Translation entry whose term equals `token` exactly.
pub fn translation_for_token(token: &str) -> Option<&'static Translation> {
	TRANSLATIONS.iter().find(|entry| entry.term == token)
}

/// First domain, in priority order, with a trigger in the lower-cased query.
pub fn classify_domain(query_lower: &str) -> Option<&'static DomainExpansion> {
	DOMAIN_EXPANSIONS
		.iter()
		.find(|domain| crate::text::contains_any(query_lower, domain.triggers))
}
