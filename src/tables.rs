use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::error::{Error, Result};
use crate::random::{pick, RandomSource};

// ---------------------------------------------------------------------------
// Replacement tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Replacement {
    pub trigger: String,
    pattern: Regex,
    pub alternatives: Vec<String>,
}

impl Replacement {
    pub fn new(trigger: &str, alternatives: &[&str]) -> Result<Self> {
        if trigger.trim().is_empty() {
            return Err(Error::Table("trigger must not be empty".to_string()));
        }
        if alternatives.is_empty() {
            return Err(Error::Table(format!(
                "trigger '{trigger}' has no alternatives"
            )));
        }
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(trigger)))
            .map_err(|e| Error::Table(e.to_string()))?;
        Ok(Self {
            trigger: trigger.to_string(),
            pattern,
            alternatives: alternatives.iter().map(|a| a.to_string()).collect(),
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Replace every occurrence with one randomly chosen alternative.
    pub fn apply(&self, text: &str, rng: &mut dyn RandomSource) -> Result<String> {
        let alternative = pick(rng, &self.alternatives)?;
        Ok(self
            .pattern
            .replace_all(text, NoExpand(alternative))
            .into_owned())
    }
}

/// Ordered trigger → alternatives mapping. Earlier entries are applied first,
/// so longer phrases should precede the words they contain.
#[derive(Debug, Clone)]
pub struct ReplacementTable {
    entries: Vec<Replacement>,
}

impl ReplacementTable {
    pub fn new(entries: &[(&str, &[&str])]) -> Result<Self> {
        let entries = entries
            .iter()
            .map(|(trigger, alternatives)| Replacement::new(trigger, alternatives))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Replacement] {
        &self.entries
    }

    /// Apply each entry present in `text`; returns the new text and how many
    /// entries fired.
    pub fn apply(&self, text: &str, rng: &mut dyn RandomSource) -> Result<(String, usize)> {
        let mut result = text.to_string();
        let mut fired = 0;
        for entry in &self.entries {
            if entry.is_match(&result) {
                result = entry.apply(&result, rng)?;
                fired += 1;
            }
        }
        Ok((result, fired))
    }
}

// ---------------------------------------------------------------------------
// Built-in data
// ---------------------------------------------------------------------------

const DETECTION_GROUPS: &[&[&str]] = &[
    // Connectives
    &[
        "furthermore",
        "moreover",
        "additionally",
        "consequently",
        "therefore",
        "thus",
        "hence",
        "nonetheless",
        "nevertheless",
    ],
    // Hedged framing
    &[
        "it is important to note",
        "this is important to note",
        "it should be noted",
        "it is worth mentioning",
        "it is crucial to understand",
    ],
    // Wrap-ups
    &[
        "in conclusion",
        "to summarize",
        "in summary",
        "to sum up",
        "overall",
        "ultimately",
    ],
    // Intensifiers
    &[
        "comprehensive",
        "extensive",
        "significant",
        "substantial",
        "considerable",
        "numerous",
        "various",
        "multiple",
    ],
    // Inflated verbs
    &[
        "utilize",
        "implement",
        "facilitate",
        "optimize",
        "enhance",
        "demonstrate",
        "indicate",
        "suggest",
        "reveal",
    ],
    // Stock phrases
    &[
        "first and foremost",
        "last but not least",
        "it goes without saying",
        "needless to say",
    ],
    &[
        "delve into",
        "dive deep",
        "explore in depth",
        "shed light on",
        "bring to light",
    ],
    // Adverbs
    &[
        "undoubtedly",
        "certainly",
        "indeed",
        "obviously",
        "clearly",
        "evidently",
        "apparently",
        "presumably",
        "supposedly",
        "allegedly",
        "reportedly",
        "seemingly",
        "arguably",
        "notably",
        "remarkably",
        "surprisingly",
        "interestingly",
        "unfortunately",
        "fortunately",
        "hopefully",
        "ideally",
        "eventually",
        "finally",
        "initially",
        "originally",
        "previously",
        "subsequently",
        "meanwhile",
        "simultaneously",
        "alternatively",
        "conversely",
        "similarly",
        "likewise",
    ],
];

const PHRASES: &[(&str, &[&str])] = &[
    (
        "vattnets kretslopp är en ständig process",
        &[
            "vatten cirkulerar kontinuerligt",
            "vatten rör sig i ett kretslopp",
            "vattnets cirkulation pågår ständigt",
        ],
    ),
    (
        "drivs av solens energi",
        &[
            "solen driver processen",
            "solenergi är drivkraften",
            "solen ger energi till processen",
        ],
    ),
    (
        "avgörande för allt liv på vår planet",
        &[
            "viktigt för allt liv på jorden",
            "nödvändigt för livet på planeten",
            "grundläggande för jordens liv",
        ],
    ),
    (
        "genom en process som kallas",
        &[
            "genom processen",
            "via den process som kallas",
            "genom det som kallas",
        ],
    ),
    (
        "cirkulera i ett evigt kretslopp",
        &[
            "cirkulerar kontinuerligt",
            "rör sig i kretslopp",
            "fortsätter att cirkulera",
        ],
    ),
    (
        "spelar en central roll",
        &["är viktigt för", "har stor betydelse för", "påverkar"],
    ),
    (
        "ständigt har tillgång till",
        &[
            "alltid har tillgång till",
            "kontinuerligt kan komma åt",
            "har konstant tillgång till",
        ],
    ),
    (
        "en avgörande faktor",
        &[
            "en viktig faktor",
            "något som påverkar mycket",
            "en betydelsefull aspekt",
        ],
    ),
    (
        "av fundamental betydelse",
        &["mycket viktigt", "grundläggande viktigt", "av stor betydelse"],
    ),
    (
        "kontinuerlig process",
        &["pågående process", "process som fortsätter", "ständigt pågående"],
    ),
    (
        "väsentlig för",
        &["viktig för", "betydelsefull för", "nödvändig för"],
    ),
    (
        "essentiell komponent",
        &["viktig del", "nödvändig komponent", "central del"],
    ),
    (
        "konstant rörelse",
        &["ständig rörelse", "kontinuerlig rörelse", "pågående rörelse"],
    ),
    (
        "oavbrutet flöde",
        &["kontinuerligt flöde", "ständigt flöde", "pågående flöde"],
    ),
];

const VOCABULARY: &[(&str, &[&str])] = &[
    ("analysera", &["undersöka", "granska", "studera"]),
    ("konstatera", &["fastställa", "notera", "observera"]),
    ("diskutera", &["behandla", "tala om", "gå igenom"]),
    ("argumentera", &["resonera", "förklara", "motivera"]),
    ("exemplifiera", &["illustrera", "visa exempel på", "ge exempel"]),
    ("konkludera", &["dra slutsatsen", "sammanfatta", "komma fram till"]),
    ("reflektera", &["fundera över", "betrakta", "överväga"]),
    (
        "problematisera",
        &["ifrågasätta", "belysa problem med", "kritiskt granska"],
    ),
    ("karaktärisera", &["beskriva", "känneteckna", "utmärka"]),
    ("specificera", &["precisera", "förtydliga", "ange i detalj"]),
    (
        "transpiration",
        &["avdunstning från växter", "växternas vattenavgång"],
    ),
    ("evaporation", &["avdunstning", "förångning"]),
    ("kondensation", &["kondensering", "vattenbildning"]),
];

const GRAMMAR: &[(&str, &[&str])] = &[
    ("eftersom", &["då", "för att"]),
    ("därför att", &["för att", "då"]),
    ("på grund av", &["till följd av", "beroende på"]),
    ("med anledning av", &["på grund av", "till följd av"]),
    ("i och med att", &["eftersom", "då"]),
    ("trots att", &["även om", "fastän"]),
    ("även om", &["trots att", "fastän"]),
    ("å andra sidan", &["däremot", "samtidigt"]),
    ("däremot", &["å andra sidan", "samtidigt"]),
    ("emellertid", &["dock", "samtidigt"]),
];

const SHORT_TEXT: &[(&str, &[&str])] = &[
    (
        "här är de viktigaste aspekterna",
        &["det viktigaste är", "huvudpunkterna är", "det centrala är"],
    ),
    (
        "integreras på olika nivåer",
        &[
            "kopplas ihop på olika sätt",
            "hänger ihop på olika vis",
            "sammankopplas",
        ],
    ),
    (
        "företag, länder och samhällen",
        &[
            "företag, länder och folk",
            "organisationer, länder och människor",
            "företag, stater och samhällen",
        ],
    ),
    (
        "de viktigaste aspekterna",
        &["det viktigaste", "huvudpunkterna", "det centrala"],
    ),
    (
        "på olika nivåer",
        &["på olika sätt", "på flera plan", "på olika vis"],
    ),
    ("aspekterna", &["punkterna", "delarna", "sakerna"]),
    ("integreras", &["kopplas ihop", "hänger ihop", "sammankopplas"]),
    ("samhällen", &["folk", "människor", "samhället"]),
];

pub const CONNECTORS: &[&str] = &["Men", "Och", "Fast", "Dessutom", "Sen"];

pub const HEDGES: &[&str] = &["alltså", "liksom", "typ", "kanske", "möjligen", "tror jag"];

pub const SELF_CORRECTIONS: &[&str] = &[
    "eller",
    "alltså",
    "liksom",
    "typ",
    "kanske",
    "möjligen",
    "tror jag",
    "eller nåt sånt",
    "eller hur",
    "va",
];

pub const ASIDES: &[&str] = &[
    "(tror jag)",
    "(eller?)",
    "(om jag fattat rätt)",
    "(kanske)",
    "(möjligen)",
    "(eller nåt sånt)",
];

pub const FINAL_FILLERS: &[&str] = &["asså", "alltså", "liksom", "typ", "kanske", "möjligen"];

pub const STARTERS: &[&str] = &[
    "Det viktiga är att ",
    "Grundläggande så ",
    "I grunden handlar det om att ",
];

/// Lead-ins that already read as informal; short texts starting with one of
/// these are left without an added starter.
pub const INFORMAL_LEAD_INS: &[&str] = &["det ", "här "];

pub const FORMAL_LEAD_IN: &str = "här är de viktigaste aspekterna";
pub const FORMAL_LEAD_IN_REPLACEMENT: &str = "det viktigaste är";

pub const LAST_RESORT_INTERJECTION: &str = "Alltså";

// ---------------------------------------------------------------------------
// Pattern tables
// ---------------------------------------------------------------------------

/// Which replacement table an optimization pass draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dictionary {
    Vocabulary,
    Phrases,
    Grammar,
}

/// Everything the analyzer, pipeline and estimator read. Built once and
/// shared by reference.
#[derive(Debug, Clone)]
pub struct PatternTables {
    pub detection: Vec<Regex>,
    pub fallback_connectives: Vec<Regex>,
    pub phrases: ReplacementTable,
    pub vocabulary: ReplacementTable,
    pub grammar: ReplacementTable,
    pub short_text: ReplacementTable,
}

static BUILTIN: Lazy<PatternTables> =
    Lazy::new(|| PatternTables::from_builtin_data().expect("built-in pattern tables are valid"));

impl PatternTables {
    pub fn builtin() -> &'static PatternTables {
        &BUILTIN
    }

    fn from_builtin_data() -> Result<Self> {
        Ok(Self {
            detection: DETECTION_GROUPS
                .iter()
                .map(|group| detection_regex(group))
                .collect::<Result<Vec<_>>>()?,
            fallback_connectives: vec![
                detection_regex(&[
                    "furthermore",
                    "moreover",
                    "additionally",
                    "however",
                    "therefore",
                    "thus",
                ])?,
                detection_regex(&["it is important to note", "it should be noted"])?,
            ],
            phrases: ReplacementTable::new(PHRASES)?,
            vocabulary: ReplacementTable::new(VOCABULARY)?,
            grammar: ReplacementTable::new(GRAMMAR)?,
            short_text: ReplacementTable::new(SHORT_TEXT)?,
        })
    }

    /// Total detection-pattern matches in `text`.
    pub fn detection_count(&self, text: &str) -> usize {
        self.detection
            .iter()
            .map(|re| re.find_iter(text).count())
            .sum()
    }

    pub fn has_detection_match(&self, text: &str) -> bool {
        self.detection.iter().any(|re| re.is_match(text))
    }

    pub fn dictionary(&self, dictionary: Dictionary) -> &ReplacementTable {
        match dictionary {
            Dictionary::Vocabulary => &self.vocabulary,
            Dictionary::Phrases => &self.phrases,
            Dictionary::Grammar => &self.grammar,
        }
    }
}

/// Case-insensitive, word-bounded alternation over `terms`, swallowing one
/// directly following comma so removal does not leave it orphaned.
pub fn detection_regex(terms: &[&str]) -> Result<Regex> {
    if terms.is_empty() || terms.iter().any(|t| t.trim().is_empty()) {
        return Err(Error::Table("detection terms must be non-empty".to_string()));
    }
    let alt = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alt})\b,?")).map_err(|e| Error::Table(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ConstantRandom;

    #[test]
    fn builtin_tables_load() {
        let tables = PatternTables::builtin();
        assert_eq!(tables.detection.len(), DETECTION_GROUPS.len());
        assert_eq!(tables.vocabulary.entries().len(), VOCABULARY.len());
    }

    #[test]
    fn empty_alternatives_are_rejected() {
        let err = ReplacementTable::new(&[("ord", &[])]).unwrap_err();
        assert!(matches!(err, Error::Table(_)));
        assert!(ReplacementTable::new(&[(" ", &["x"])]).is_err());
    }

    #[test]
    fn replacement_is_case_insensitive_and_word_bounded() {
        let table = ReplacementTable::new(&[("analysera", &["granska"])]).unwrap();
        let mut rng = ConstantRandom(0.0);
        let (out, fired) = table
            .apply("Analysera texten, analyserar du?", &mut rng)
            .unwrap();
        assert_eq!(out, "granska texten, analyserar du?");
        assert_eq!(fired, 1);
    }

    #[test]
    fn longer_triggers_come_first() {
        let tables = PatternTables::builtin();
        for table in [
            &tables.phrases,
            &tables.vocabulary,
            &tables.grammar,
            &tables.short_text,
        ] {
            let triggers: Vec<&str> = table.entries().iter().map(|e| e.trigger.as_str()).collect();
            for (i, earlier) in triggers.iter().enumerate() {
                for later in &triggers[i + 1..] {
                    assert!(
                        !later.contains(earlier),
                        "'{earlier}' would shadow '{later}'"
                    );
                }
            }
        }
    }

    #[test]
    fn detection_counts_every_match() {
        let tables = PatternTables::builtin();
        assert_eq!(
            tables.detection_count("Furthermore, it is clearly significant. Thus it works."),
            4
        );
        assert_eq!(tables.detection_count("Katten sover."), 0);
    }
}
