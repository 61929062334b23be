//! Built-in incident catalog.
//!
//! Each scenario id doubles as the key into the criteria table
//! (see `criteria::CriteriaTable::builtin`).

use serde::Serialize;
use std::fmt;

/// Incident category shown on the map and stored with history entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncidentType {
    Trauma,
    Medical,
    Fire,
}

impl IncidentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Trauma => "TRAUMA",
            IncidentType::Medical => "MEDICAL",
            IncidentType::Fire => "FIRE",
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
        };
        f.write_str(s)
    }
}

/// A simulated emergency call
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub code: &'static str,
    pub title: &'static str,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub city: &'static str,
    pub country: &'static str,
    /// (longitude, latitude)
    pub coords: (f64, f64),
    pub severity: Severity,
    pub description: &'static str,
    pub call_sign: &'static str,
    /// First thing the simulated caller says when the call connects
    pub opening_line: &'static str,
}

static SCENARIOS: [Scenario; 6] = [
    Scenario {
        id: "gsw-nyc",
        code: "CODE-1",
        title: "Gunshot Wound",
        incident_type: IncidentType::Trauma,
        city: "New York",
        country: "USA",
        coords: (-74.006, 40.7128),
        severity: Severity::Critical,
        description: "Male victim, multiple gunshot wounds, Central Park area. Caller is barely conscious.",
        call_sign: "UNIT-911-NYC",
        opening_line: "Help... I've been shot... oh god... Central Park... please hurry...",
    },
    Scenario {
        id: "cardiac-lon",
        code: "CODE-2",
        title: "Cardiac Arrest",
        incident_type: IncidentType::Medical,
        city: "London",
        country: "UK",
        coords: (-0.1278, 51.5074),
        severity: Severity::Critical,
        description: "Elderly woman collapsed in Covent Garden. Bystander calling on behalf, patient unresponsive.",
        call_sign: "UNIT-999-LON",
        opening_line: "Hello?! Yes, please, this woman collapsed, she's not moving, I don't know what to do!",
    },
    Scenario {
        id: "fire-tky",
        code: "CODE-3",
        title: "Building Fire",
        incident_type: IncidentType::Fire,
        city: "Tokyo",
        country: "Japan",
        coords: (139.6503, 35.6762),
        severity: Severity::High,
        description: "Apartment fire, Shinjuku district. Caller trapped on 4th floor, heavy smoke.",
        call_sign: "UNIT-119-TKY",
        opening_line: "Please help me! There's fire... I'm on the fourth floor... so much smoke...",
    },
    Scenario {
        id: "accident-syd",
        code: "CODE-4",
        title: "Car Accident",
        incident_type: IncidentType::Trauma,
        city: "Sydney",
        country: "Australia",
        coords: (151.2093, -33.8688),
        severity: Severity::High,
        description: "Multi-vehicle collision on Sydney Harbour Bridge. Two injured, one unconscious.",
        call_sign: "UNIT-000-SYD",
        opening_line: "Yeah hi, I need help, I'm on the Harbour Bridge, there's been a crash, my mate is knocked out...",
    },
    Scenario {
        id: "drowning-mia",
        code: "CODE-5",
        title: "Drowning",
        incident_type: IncidentType::Medical,
        city: "Miami",
        country: "USA",
        coords: (-80.1918, 25.7617),
        severity: Severity::Critical,
        description: "Child drowning victim pulled from pool in Miami Beach. Not breathing.",
        call_sign: "UNIT-911-MIA",
        opening_line: "MY SON! He was in the pool! He's not breathing! PLEASE HELP ME!",
    },
    Scenario {
        id: "overdose-la",
        code: "CODE-6",
        title: "Drug Overdose",
        incident_type: IncidentType::Medical,
        city: "Los Angeles",
        country: "USA",
        coords: (-118.2437, 34.0522),
        severity: Severity::High,
        description: "Suspected fentanyl overdose, Hollywood area. Caller found friend unresponsive.",
        call_sign: "UNIT-911-LAX",
        opening_line: "Hi yeah I need an ambulance, my roommate... I can't wake them up... I'm really scared...",
    },
];

/// All built-in scenarios, in catalog order
pub fn scenarios() -> &'static [Scenario] {
    &SCENARIOS
}

/// Look up a scenario by id
pub fn get_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}
