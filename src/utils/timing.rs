// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIMING UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Relógio de parede e timestamp de início de uma query.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::{Duration, Instant};

/// Timer para medir duração de uma query
pub struct QueryTimer {
    start: Instant,
    started_at: String,
    label: String,
}

impl QueryTimer {
    /// Inicia o timer e registra o timestamp ISO-8601 local
    pub fn start(label: &str) -> Self {
        Self {
            start: Instant::now(),
            started_at: chrono::Local::now().to_rfc3339(),
            label: label.to_string(),
        }
    }

    /// Timestamp do início
    pub fn started_at(&self) -> &str {
        &self.started_at
    }

    /// Retorna o tempo decorrido como Duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Tempo decorrido em segundos (fração incluída)
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Para o timer, loga e devolve segundos decorridos
    pub fn stop_and_log(self) -> f64 {
        let secs = self.elapsed_secs();
        log::info!("⏱️  {} completado em {:.0}ms", self.label, secs * 1000.0);
        secs
    }
}
