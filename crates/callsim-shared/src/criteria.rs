//! Scenario criteria tables.
//!
//! A profile is pure data: an ordered list of critical steps the operator
//! must take and an ordered list of fatal statements that fail the call on
//! their own. Each entry pairs a label with a compiled, case-insensitive
//! detector. The evaluator never branches on scenario ids; adding a scenario
//! means adding a profile.

use crate::error::CallsimError;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix applied to a critical step's label when it is missed
pub const MISSED_PREFIX: &str = "MISSED: ";

/// Case-insensitive pattern test over normalized operator speech
#[derive(Debug, Clone)]
pub struct Detector {
    regex: Regex,
}

impl Detector {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// One labelled detector
#[derive(Debug, Clone)]
pub struct Criterion {
    pub label: String,
    missed_label: Option<String>,
    pub detector: Detector,
}

impl Criterion {
    pub fn new(label: &str, pattern: &str) -> Result<Self, CallsimError> {
        let detector = Detector::new(pattern).map_err(|source| CallsimError::InvalidPattern {
            label: label.to_string(),
            source,
        })?;
        Ok(Self {
            label: label.to_string(),
            missed_label: None,
            detector,
        })
    }

    /// Use custom wording in `bad` instead of the prefixed label
    pub fn with_missed_label(mut self, missed: &str) -> Self {
        self.missed_label = Some(missed.to_string());
        self
    }

    /// Label recorded in `bad` when this step is not detected
    pub fn missed_label(&self) -> String {
        match &self.missed_label {
            Some(missed) => missed.clone(),
            None => format!("{}{}", MISSED_PREFIX, self.label),
        }
    }

    fn compile(spec: &CriterionSpec) -> Result<Self, CallsimError> {
        let criterion = Self::new(&spec.label, &spec.pattern)?;
        Ok(match &spec.missed_label {
            Some(missed) => criterion.with_missed_label(missed),
            None => criterion,
        })
    }
}

/// Compiled critical/fatal lists for one scenario
#[derive(Debug, Clone)]
pub struct CriteriaProfile {
    pub critical: Vec<Criterion>,
    pub fatal: Vec<Criterion>,
}

impl CriteriaProfile {
    pub fn compile(spec: &ProfileSpec) -> Result<Self, CallsimError> {
        if spec.critical.is_empty() {
            return Err(CallsimError::Config(
                "criteria profile must define at least one critical step".to_string(),
            ));
        }
        let critical = spec.critical.iter().map(Criterion::compile).collect::<Result<_, _>>()?;
        let fatal = spec.fatal.iter().map(Criterion::compile).collect::<Result<_, _>>()?;
        Ok(Self { critical, fatal })
    }

    /// Labels of the critical steps, in profile order
    pub fn critical_labels(&self) -> Vec<&str> {
        self.critical.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Uncompiled criterion, as written in config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSpec {
    pub label: String,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missed_label: Option<String>,
}

impl CriterionSpec {
    pub fn new(label: &str, pattern: &str) -> Self {
        Self {
            label: label.to_string(),
            pattern: pattern.to_string(),
            missed_label: None,
        }
    }
}

/// Uncompiled profile, as written in config files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub critical: Vec<CriterionSpec>,
    #[serde(default)]
    pub fatal: Vec<CriterionSpec>,
}

impl ProfileSpec {
    fn from_pairs(critical: &[(&str, &str)], fatal: &[(&str, &str)]) -> Self {
        Self {
            critical: critical.iter().map(|(l, p)| CriterionSpec::new(l, p)).collect(),
            fatal: fatal.iter().map(|(l, p)| CriterionSpec::new(l, p)).collect(),
        }
    }
}

/// Scenario id -> profile, with a generic checklist for unknown ids
#[derive(Debug, Clone)]
pub struct CriteriaTable {
    profiles: BTreeMap<String, CriteriaProfile>,
    generic: CriteriaProfile,
}

static BUILTIN: Lazy<CriteriaTable> =
    Lazy::new(|| CriteriaTable::compile_builtin().expect("built-in criteria patterns are valid"));

impl CriteriaTable {
    /// Shared table of the built-in scenarios, compiled once
    pub fn builtin() -> &'static CriteriaTable {
        &BUILTIN
    }

    /// Compile a fresh copy of the built-in table (for extending)
    pub fn compile_builtin() -> Result<Self, CallsimError> {
        let mut profiles = BTreeMap::new();
        for (id, critical, fatal) in BUILTIN_PROFILES {
            let profile = CriteriaProfile::compile(&ProfileSpec::from_pairs(critical, fatal))?;
            profiles.insert(id.to_string(), profile);
        }

        let generic_spec = ProfileSpec {
            critical: GENERIC_CRITICAL
                .iter()
                .map(|(label, missed, pattern)| CriterionSpec {
                    label: label.to_string(),
                    pattern: pattern.to_string(),
                    missed_label: Some(missed.to_string()),
                })
                .collect(),
            fatal: Vec::new(),
        };
        let generic = CriteriaProfile::compile(&generic_spec)?;

        Ok(Self { profiles, generic })
    }

    /// Add or replace a profile
    pub fn insert(&mut self, scenario_id: &str, profile: CriteriaProfile) {
        self.profiles.insert(scenario_id.to_string(), profile);
    }

    /// Compile and add a profile from its spec
    pub fn insert_spec(&mut self, scenario_id: &str, spec: &ProfileSpec) -> Result<(), CallsimError> {
        let profile = CriteriaProfile::compile(spec)?;
        self.insert(scenario_id, profile);
        Ok(())
    }

    /// Exact lookup, no fallback
    pub fn get(&self, scenario_id: &str) -> Option<&CriteriaProfile> {
        self.profiles.get(scenario_id)
    }

    /// Profile for a scenario, or the generic checklist when unknown
    pub fn profile_for(&self, scenario_id: &str) -> &CriteriaProfile {
        self.profiles.get(scenario_id).unwrap_or(&self.generic)
    }

    pub fn scenario_ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

type PairList = &'static [(&'static str, &'static str)];

/// (scenario id, critical steps, fatal statements)
const BUILTIN_PROFILES: &[(&str, PairList, PairList)] = &[
    (
        "gsw-nyc",
        &[
            ("Asked for exact location", r"where are you|location|address|central park|where('?re| are) you"),
            ("Told caller to apply direct pressure to wound", r"press|pressure|apply|hold.*wound|cloth|hand on"),
            ("Confirmed ambulance is on the way", r"help is (coming|on the way)|ambulance|sending|dispatch(ed|ing)|unit(s)? en route"),
            ("Kept caller conscious and calm", r"stay (with me|awake|conscious)|keep talking|don'?t (fall asleep|pass out)|stay calm|breathe"),
        ],
        &[
            ("Told caller to remove or pull out bullet — FATAL", r"remove.*bullet|pull.*bullet|pull it out|take.*bullet out"),
            ("Told caller to sit or stand up — worsens blood loss", r"sit up|stand up|get up"),
            ("Told caller to run or move — FATAL blood loss risk", r"run|walk to|move (to|toward|towards)"),
        ],
    ),
    (
        "cardiac-lon",
        &[
            ("Asked for exact location", r"where|location|address|covent|street"),
            ("Instructed caller to start CPR", r"cpr|chest compression|pump|push.*chest|compress"),
            ("Asked if patient is breathing", r"breathing|breath|breathe|responsive|responding|conscious"),
            ("Confirmed ambulance is coming", r"help is (coming|on the way)|ambulance|sending|dispatch"),
        ],
        &[
            ("Told caller to move the unconscious patient — spinal risk", r"move her|move them|drag|lift.*up|carry"),
            ("Told caller to give patient food or water — aspiration risk", r"give.*water|give.*drink|give.*food|feed"),
            ("Told caller to slap or shake patient to wake them", r"slap|shake.*wake|wake.*slap"),
        ],
    ),
    (
        "fire-tky",
        &[
            ("Got exact address and floor number", r"address|floor|where|shinjuku|building|room"),
            ("Told caller to stay low below the smoke", r"stay low|get low|crawl|below.*smoke|under.*smoke"),
            ("Told caller not to use the elevator", r"elevator|don'?t.*elevator|stairs|no elevator"),
            ("Confirmed fire services are coming", r"fire.*coming|help.*way|sending|dispatch|firefighter"),
        ],
        &[
            ("Told caller to open window and jump from 4th floor — FATAL", r"jump|open.*window.*jump|jump.*window"),
            ("Told caller to run through smoke without covering mouth", r"run through|just run|go through the smoke"),
        ],
    ),
    (
        "accident-syd",
        &[
            ("Got exact location (Harbour Bridge)", r"where|location|address|harbour|bridge|street"),
            ("Asked how many people are injured", r"how many|number of|anyone else|other (people|passengers|injured)"),
            ("Told caller NOT to move the unconscious passenger", r"don'?t move|do not move|leave.*there|stay still|spinal"),
            ("Confirmed emergency services are coming", r"help.*coming|way|sending|dispatch|ambulance|police"),
        ],
        &[
            ("Told caller to move the unconscious person — spinal injury risk", r"move.*him|move.*her|move.*them|pull.*out|drag.*out"),
            ("Told caller to leave the scene", r"leave|get away|drive away|abandon"),
        ],
    ),
    (
        "drowning-mia",
        &[
            ("Got the address of the home", r"address|where (are you|is this)|location|street"),
            ("Instructed caller to start rescue breathing or CPR", r"cpr|breathe for|rescue breath|compression|pump|tilt.*head|mouth to mouth"),
            ("Kept caller calm enough to take action", r"stay calm|breathe|listen to me|you can do this|follow|i('m| am) here"),
            ("Confirmed ambulance is on the way", r"help.*coming|on the way|sending|dispatch|ambulance"),
        ],
        &[
            ("Told caller to put child back in water", r"back.*water|put.*in.*water|water.*again"),
            ("Told caller to give food or drink to unresponsive child", r"give.*water|give.*drink|pour"),
        ],
    ),
    (
        "overdose-la",
        &[
            ("Got the address", r"address|where (are you|is this)|location|street|hollywood"),
            ("Asked what substance was taken", r"what.*took|what.*take|drug|substance|fentanyl|pills|what.*swallow"),
            ("Asked if patient is breathing", r"breathing|breath|breathe|responsive|unconscious|awake"),
            ("Confirmed ambulance is coming", r"help.*coming|on the way|sending|dispatch|ambulance"),
        ],
        &[
            ("Told caller to leave the scene — deters help and abandons patient", r"leave|get out of there|run|leave.*scene"),
            ("Threatened caller about drugs — discourages future calls", r"trouble|arrest|call.*police on|report you|get in trouble"),
        ],
    ),
];

/// (label, missed wording, pattern) for scenarios without a profile
const GENERIC_CRITICAL: &[(&str, &str, &str)] = &[
    ("Asked for location", "MISSED: Did not ask for exact location", r"where|location|address"),
    ("Confirmed help is coming", "MISSED: Never confirmed ambulance is on the way", r"help.*coming|ambulance|dispatch|sending"),
    ("Reassured the caller", "MISSED: Never reassured the caller", r"calm|breathe|stay.*me|here with you"),
];
