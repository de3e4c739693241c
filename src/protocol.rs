//! Public protocol structs for HTTP and WebSocket endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Achievement, Challenge, ChallengeSource, Comment, Difficulty, LeaderboardEntry, TestCase};
use crate::logic::{RunOutcome, RunReport};
use crate::reconcile::TestOutcome;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Run {
        #[serde(rename = "challengeId")]
        challenge_id: String,
        #[serde(rename = "sourceCode")]
        source_code: String,
    },
    Leaderboard {
        limit: Option<usize>,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    RunResult {
        result: RunOut,
    },
    Leaderboard {
        entries: Vec<LeaderboardEntryOut>,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Deserialize)]
pub struct SessionIn {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct SessionOut {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeListQuery {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

/// Compact catalog row for the dashboard listing.
#[derive(Serialize)]
pub struct ChallengeSummaryOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: String,
}

/// Full challenge document for the editor page.
#[derive(Serialize)]
pub struct ChallengeOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub source: ChallengeSource,

    #[serde(rename = "initialCode")]
    pub initial_code: String,
    #[serde(rename = "solutionCode")]
    pub solution_code: Option<String>,
    #[serde(rename = "testCases")]
    pub test_cases: Vec<TestCase>,
    pub hint: String,
    #[serde(rename = "videoUrl")]
    pub video_url: String,
}

#[derive(Serialize)]
pub struct ResetOut {
    #[serde(rename = "initialCode")]
    pub initial_code: String,
}

#[derive(Deserialize)]
pub struct RunIn {
    #[serde(rename = "challengeId")]
    pub challenge_id: String,
    #[serde(rename = "sourceCode")]
    pub source_code: String,
}

/// Terminal result of a run, tagged by how it ended.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOut {
    Evaluated {
        #[serde(rename = "allPassed")]
        all_passed: bool,
        outcomes: Vec<TestOutcome>,
        #[serde(rename = "progressPercent")]
        progress_percent: u8,
        #[serde(rename = "newlyCredited")]
        newly_credited: bool,
        #[serde(rename = "newlyEarned")]
        newly_earned: Vec<Achievement>,
    },
    Rejected {
        #[serde(rename = "statusId")]
        status_id: i64,
        description: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntryOut {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    pub score: u32,
}

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    #[serde(rename = "challengeId")]
    pub challenge_id: String,
}

#[derive(Deserialize)]
pub struct CommentIn {
    #[serde(rename = "challengeId")]
    pub challenge_id: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct CommentOut {
    pub id: String,
    #[serde(rename = "challengeId")]
    pub challenge_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

//
// Converters from internal models to the public DTOs.
//

pub fn to_summary(c: &Challenge) -> ChallengeSummaryOut {
    ChallengeSummaryOut {
        id: c.id.clone(),
        title: c.title.clone(),
        description: c.description.clone(),
        difficulty: c.difficulty,
        category: c.category.clone(),
    }
}

pub fn to_out(c: &Challenge) -> ChallengeOut {
    ChallengeOut {
        id: c.id.clone(),
        title: c.title.clone(),
        description: c.description.clone(),
        difficulty: c.difficulty,
        category: c.category.clone(),
        source: c.source.clone(),

        initial_code: c.initial_code.clone(),
        solution_code: c.solution_code.clone(),
        test_cases: c.test_cases.clone(),
        hint: c.hint.clone(),
        video_url: c.video_url.clone(),
    }
}

pub fn to_entry_out(e: &LeaderboardEntry) -> LeaderboardEntryOut {
    LeaderboardEntryOut {
        user_id: e.user_id.clone(),
        username: e.username.clone(),
        score: e.score,
    }
}

pub fn to_comment_out(c: &Comment) -> CommentOut {
    CommentOut {
        id: c.id.clone(),
        challenge_id: c.challenge_id.clone(),
        user_id: c.user_id.clone(),
        username: c.username.clone(),
        content: c.content.clone(),
        created_at: c.created_at,
    }
}

pub fn to_run_out(outcome: RunOutcome) -> RunOut {
    match outcome {
        RunOutcome::Evaluated(RunReport {
            outcomes,
            all_passed,
            progress_percent,
            newly_credited,
            newly_earned,
        }) => RunOut::Evaluated {
            all_passed,
            outcomes,
            progress_percent,
            newly_credited,
            newly_earned,
        },
        RunOutcome::Rejected { status_id, description } => {
            RunOut::Rejected { status_id, description }
        }
    }
}
