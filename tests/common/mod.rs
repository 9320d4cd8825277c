//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;
use team_balancer_web::{
    Player, SubmissionError, SubmissionGateway, SubmissionPayload, SubmissionReceipt, Teams,
};

/// Records every payload and answers with a canned result.
pub struct FakeGateway {
    pub sent: Mutex<Vec<SubmissionPayload>>,
    reply: Result<SubmissionReceipt, SubmissionError>,
    delay: Duration,
}

impl FakeGateway {
    pub fn ok() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reply: Ok(SubmissionReceipt {
                message: Some("Game results recorded successfully".into()),
                count: Some(2),
                event_ids: vec![1, 2],
            }),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(err: SubmissionError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reply: Err(err),
            delay: Duration::ZERO,
        }
    }

    /// Answer only after `delay`, like a slow service.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl SubmissionGateway for FakeGateway {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        self.sent.lock().unwrap().push(payload.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}

pub fn ann_vs_bo() -> Teams {
    Teams::new(vec![Player::new(1, "Ann", 3.0)], vec![Player::new(2, "Bo", 3.0)])
}

pub fn two_v_two() -> Teams {
    Teams::new(
        vec![Player::new(1, "Ann", 4.0), Player::new(2, "Bo", 2.0)],
        vec![Player::new(3, "Cy", 3.5), Player::unregistered("Dee", 2.5)],
    )
}
