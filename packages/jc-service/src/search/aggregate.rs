use std::collections::HashMap;

use jc_domain::JobDocument;

/// One retrieved job with the history of every query variant that found it.
#[derive(Clone, Debug)]
pub struct Candidate {
	pub job: JobDocument,
	pub distances: Vec<f32>,
	pub matched_queries: Vec<String>,
}
impl Candidate {
	pub fn match_count(&self) -> usize {
		self.distances.len()
	}

	pub fn avg_distance(&self) -> f32 {
		if self.distances.is_empty() {
			return 0.0;
		}

		self.distances.iter().sum::<f32>() / self.distances.len() as f32
	}
}

/// Merges hits by job id, keeping first-seen order.
#[derive(Debug, Default)]
pub struct Aggregator {
	candidates: Vec<Candidate>,
	index: HashMap<String, usize>,
}
impl Aggregator {
	pub fn add(&mut self, job: JobDocument, distance: f32, query: &str) {
		if let Some(&idx) = self.index.get(&job.id) {
			let candidate = &mut self.candidates[idx];

			candidate.distances.push(distance);
			candidate.matched_queries.push(query.to_string());

			return;
		}

		self.index.insert(job.id.clone(), self.candidates.len());
		self.candidates.push(Candidate {
			job,
			distances: vec![distance],
			matched_queries: vec![query.to_string()],
		});
	}

	pub fn into_candidates(self) -> Vec<Candidate> {
		self.candidates
	}
}
