use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::str::FromStr;

/// The parameters a survey flow is derived from.
///
/// Field aliases accept the camelCase spelling used by existing survey definitions,
/// e.g. `{"flowName": "...", "numberOfQuestions": 10}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(alias = "flowName")]
    pub flow_name: String,
    #[serde(alias = "flowDescription")]
    pub flow_description: String,
    #[serde(alias = "numberOfQuestions")]
    pub number_of_questions: i64,
    #[serde(default, alias = "hasCloseTheLoop")]
    pub has_close_the_loop: bool,
    /// Accepted and validated, but not wired into the task graph yet.
    #[serde(default, alias = "loopCount")]
    pub loop_count: i64,
    #[serde(alias = "dataActionId")]
    pub data_action_id: String,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            flow_name: "001-MyFlow-Survey-Test".to_string(),
            flow_description: "Flujo de IVR de encuesta".to_string(),
            number_of_questions: 10,
            has_close_the_loop: true,
            loop_count: 3,
            data_action_id: "custom_-_cf430cad-a5ad-4e8a-83b2-612362d3518f".to_string(),
        }
    }
}

impl SurveyConfig {
    /// Load a survey config from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks the preconditions of plan construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flow_name.trim().is_empty() {
            return Err(ConfigError::EmptyFlowName);
        }
        if self.flow_description.trim().is_empty() {
            return Err(ConfigError::EmptyDescription);
        }
        if self.number_of_questions < 0 {
            return Err(ConfigError::NegativeQuestionCount(self.number_of_questions));
        }
        if self.loop_count < 0 {
            return Err(ConfigError::NegativeLoopCount(self.loop_count));
        }
        if self.data_action_id.trim().is_empty() {
            return Err(ConfigError::EmptyDataActionId);
        }
        Ok(())
    }

    /// The validated question count.
    pub fn question_count(&self) -> Result<u32, ConfigError> {
        let n = self.number_of_questions;
        u32::try_from(n).map_err(|_| {
            if n < 0 {
                ConfigError::NegativeQuestionCount(n)
            } else {
                ConfigError::TooManyQuestions(n)
            }
        })
    }
}

/// Flow-level settings applied right after the flow is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSettings {
    /// Expression played as the initial greeting.
    pub initial_audio: String,
    pub speech_recognition: bool,
    pub company_directory: bool,
    pub language: String,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            initial_audio: r#"ToAudioTTS("welcome to the flow")"#.to_string(),
            speech_recognition: false,
            company_directory: false,
            language: "en-us".to_string(),
        }
    }
}

/// Region hosting the contact-center organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    ProdUsEast1,
    ProdUsWest2,
    ProdCaCentral1,
    ProdEuWest1,
    ProdEuCentral1,
    ProdEuWest2,
    ProdApSoutheast2,
    ProdApNortheast1,
}

impl Location {
    const ALL: [Location; 8] = [
        Location::ProdUsEast1,
        Location::ProdUsWest2,
        Location::ProdCaCentral1,
        Location::ProdEuWest1,
        Location::ProdEuCentral1,
        Location::ProdEuWest2,
        Location::ProdApSoutheast2,
        Location::ProdApNortheast1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::ProdUsEast1 => "prod_us_east_1",
            Location::ProdUsWest2 => "prod_us_west_2",
            Location::ProdCaCentral1 => "prod_ca_central_1",
            Location::ProdEuWest1 => "prod_eu_west_1",
            Location::ProdEuCentral1 => "prod_eu_central_1",
            Location::ProdEuWest2 => "prod_eu_west_2",
            Location::ProdApSoutheast2 => "prod_ap_southeast_2",
            Location::ProdApNortheast1 => "prod_ap_northeast_1",
        }
    }

    pub fn host(&self) -> &'static str {
        match self {
            Location::ProdUsEast1 => "mypurecloud.com",
            Location::ProdUsWest2 => "usw2.pure.cloud",
            Location::ProdCaCentral1 => "cac1.pure.cloud",
            Location::ProdEuWest1 => "mypurecloud.ie",
            Location::ProdEuCentral1 => "mypurecloud.de",
            Location::ProdEuWest2 => "euw2.pure.cloud",
            Location::ProdApSoutheast2 => "mypurecloud.com.au",
            Location::ProdApNortheast1 => "mypurecloud.jp",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Location::ALL
            .into_iter()
            .find(|l| l.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownLocation(s.to_string()))
    }
}

/// OAuth grant the client id/secret pair was registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GrantType {
    ClientCredentials,
    #[default]
    AuthorizationCode,
}

/// How to open a session against the flow backend.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub location: Location,
    pub client_id: String,
    pub client_secret: String,
    pub grant: GrantType,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::MissingCredentials("client id"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ConfigError::MissingCredentials("client secret"));
        }
        Ok(())
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("location", &self.location)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("grant", &self.grant)
            .finish()
    }
}

/// Everything one build-and-publish run needs, passed explicitly to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub survey: SurveyConfig,
    pub settings: FlowSettings,
    pub session: SessionConfig,
    pub verbose: bool,
    /// Validate only; never publish.
    pub dry_run: bool,
}
