use super::demand_level::{DemandLevel, DemandThresholds};
use super::predict_query::PredictQuery;
use super::prediction_result::PredictionResult;
use crate::model::demand::{slot_of, DemandHistory, DemandRecord};
use crate::model::error::ForecastError;
use crate::model::feature::FeatureAssembler;
use crate::model::lag::LagConfig;
use crate::model::spatial::HexGrid;
use crate::model::train::TrainedModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// predictor lifecycle. LoadFailed is terminal: a service that failed
/// validation rejects every predict call rather than serving a model whose
/// schema it cannot trust.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Unloaded,
    Loading,
    Ready,
    LoadFailed,
    Shutdown,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceState::Unloaded => write!(f, "unloaded"),
            ServiceState::Loading => write!(f, "loading"),
            ServiceState::Ready => write!(f, "ready"),
            ServiceState::LoadFailed => write!(f, "load_failed"),
            ServiceState::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// readiness snapshot for the external health endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub state: ServiceState,
    pub model_loaded: bool,
    pub schema_version: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

/// the serving adapter: owns the loaded model, the shared demand history,
/// and the demand-level thresholds. constructed once per process and passed
/// by reference to request handlers.
///
/// the model is effectively immutable once installed; reload builds and
/// validates the replacement completely before swapping the Arc, so
/// concurrent predict calls see either the old or the new model in full.
pub struct ForecastService {
    pub grid: HexGrid,
    pub assembler: FeatureAssembler,
    pub thresholds: DemandThresholds,
    history: DemandHistory,
    state: RwLock<ServiceState>,
    model: RwLock<Option<Arc<TrainedModel>>>,
}

impl ForecastService {
    pub fn new(
        grid: HexGrid,
        lag_config: Arc<LagConfig>,
        thresholds: DemandThresholds,
    ) -> Result<ForecastService, ForecastError> {
        thresholds.validate()?;
        Ok(ForecastService {
            grid,
            assembler: FeatureAssembler::new(lag_config),
            thresholds,
            history: DemandHistory::new(),
            state: RwLock::new(ServiceState::Unloaded),
            model: RwLock::new(None),
        })
    }

    pub fn state(&self) -> ServiceState {
        *self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, next: ServiceState) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = next;
    }

    /// initial startup load: Unloaded -> Loading -> Ready, or the terminal
    /// LoadFailed when the artifact cannot be read or its schema disagrees
    /// with this process's assembler.
    pub fn load(&self, path: &Path) -> Result<(), ForecastError> {
        match self.state() {
            ServiceState::Unloaded => {}
            other => {
                return Err(ForecastError::ServiceUnavailable(format!(
                    "load is only valid from the unloaded state, service is {other}"
                )))
            }
        }
        self.set_state(ServiceState::Loading);
        match self.read_and_validate(path) {
            Ok(artifact) => {
                self.install(artifact);
                self.set_state(ServiceState::Ready);
                Ok(())
            }
            Err(e) => {
                log::error!("model load failed: {e}");
                self.set_state(ServiceState::LoadFailed);
                Err(e)
            }
        }
    }

    /// installs a freshly trained artifact without a disk round trip, with
    /// the same validation as [`ForecastService::load`].
    pub fn install_trained(&self, artifact: TrainedModel) -> Result<(), ForecastError> {
        match self.state() {
            ServiceState::Unloaded | ServiceState::Ready => {}
            other => {
                return Err(ForecastError::ServiceUnavailable(format!(
                    "cannot install a model while the service is {other}"
                )))
            }
        }
        self.assembler.schema.expect_matches(&artifact.schema)?;
        self.install(artifact);
        self.set_state(ServiceState::Ready);
        Ok(())
    }

    /// swaps in a new artifact while serving. the replacement is read and
    /// validated before the swap; on any failure the old model stays
    /// installed and the service stays Ready.
    pub fn reload(&self, path: &Path) -> Result<(), ForecastError> {
        match self.state() {
            ServiceState::Ready => {}
            other => {
                return Err(ForecastError::ServiceUnavailable(format!(
                    "reload is only valid from the ready state, service is {other}"
                )))
            }
        }
        let artifact = self.read_and_validate(path)?;
        self.install(artifact);
        Ok(())
    }

    pub fn shutdown(&self) {
        self.set_state(ServiceState::Shutdown);
        let mut model = self
            .model
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *model = None;
    }

    pub fn health(&self) -> HealthStatus {
        let schema_version = self.snapshot().map(|m| m.schema.version);
        HealthStatus {
            state: self.state(),
            model_loaded: schema_version.is_some(),
            schema_version,
            timestamp: Utc::now(),
        }
    }

    /// appends aggregated records to the shared recent-history store.
    pub fn ingest(&self, records: &[DemandRecord]) {
        for record in records.iter() {
            self.history.record(record.cell, record.slot, record.count);
        }
    }

    pub fn history(&self) -> &DemandHistory {
        &self.history
    }

    /// runs one prediction. read-only: neither the model nor the history is
    /// mutated, and the only i/o is the initial model load long before.
    pub fn predict(&self, query: &PredictQuery) -> Result<PredictionResult, ForecastError> {
        match self.state() {
            ServiceState::Ready => {}
            other => {
                return Err(ForecastError::ServiceUnavailable(format!(
                    "predictor is {other}"
                )))
            }
        }
        let model = self.snapshot().ok_or_else(|| {
            ForecastError::ServiceUnavailable(String::from("no model installed"))
        })?;

        let cell = self.grid.index(query.latitude, query.longitude)?;
        let time = query.time_features()?;
        // parts-only queries anchor lags at the newest recorded slot
        let anchor = match &query.timestamp {
            Some(timestamp) => slot_of(timestamp),
            None => self.history.latest_slot().unwrap_or(0),
        };

        let vector = self.assembler.assemble(cell, &time, anchor, &self.history)?;
        model.schema.expect_matches(&vector.schema)?;

        let predicted_demand = model.model.predict(&vector.values).max(0.0);
        Ok(PredictionResult {
            cell_id: cell.to_string(),
            predicted_demand,
            demand_level: self.thresholds.classify(predicted_demand),
            latitude: query.latitude,
            longitude: query.longitude,
            hour: time.hour,
            day_of_week: time.day_of_week,
            month: time.month,
            generated_at: Utc::now(),
        })
    }

    fn read_and_validate(&self, path: &Path) -> Result<TrainedModel, ForecastError> {
        let artifact = TrainedModel::load(path)?;
        self.assembler.schema.expect_matches(&artifact.schema)?;
        log::info!(
            "loaded model artifact from {:?}: schema v{}, trained {}, mae {:.4}",
            path,
            artifact.schema.version,
            artifact.metadata.trained_at.to_rfc3339(),
            artifact.metadata.metrics.mae
        );
        Ok(artifact)
    }

    fn install(&self, artifact: TrainedModel) {
        let replacement = Arc::new(artifact);
        let mut model = self
            .model
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *model = Some(replacement);
    }

    fn snapshot(&self) -> Option<Arc<TrainedModel>> {
        let model = self
            .model
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        model.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::demand::Slot;
    use crate::model::spatial::CoverageBounds;
    use crate::model::train::{train, GbrtParams, TrainerConfig};

    fn service() -> ForecastService {
        let grid = HexGrid::new(8, CoverageBounds::default()).unwrap();
        ForecastService::new(
            grid,
            Arc::new(LagConfig::default()),
            DemandThresholds::default(),
        )
        .unwrap()
    }

    fn synthetic_records(hours: usize) -> Vec<DemandRecord> {
        let grid = HexGrid::new(8, CoverageBounds::default()).unwrap();
        let cell = grid.index(12.9352, 77.6245).unwrap();
        (0..hours)
            .map(|i| {
                let slot = 480_000 + i as Slot;
                let hour = slot.rem_euclid(24);
                let count = if (8..20).contains(&hour) { 6.0 } else { 1.0 };
                DemandRecord { cell, slot, count }
            })
            .collect()
    }

    fn quick_trainer() -> TrainerConfig {
        TrainerConfig {
            params: GbrtParams {
                n_estimators: 20,
                max_depth: 3,
                learning_rate: 0.3,
                min_samples_leaf: 1,
            },
            ..TrainerConfig::default()
        }
    }

    fn trained_artifact(hours: usize) -> TrainedModel {
        let service = service();
        train(
            &synthetic_records(hours),
            &service.assembler,
            &quick_trainer(),
        )
        .unwrap()
    }

    #[test]
    fn test_predict_before_load_is_unavailable() {
        let service = service();
        assert_eq!(service.state(), ServiceState::Unloaded);
        let query = PredictQuery::at_parts(12.9352, 77.6245, 14, 2, 6);
        assert!(matches!(
            service.predict(&query),
            Err(ForecastError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let service = service();
        let records = synthetic_records(24 * 30);
        service.install_trained(trained_artifact(24 * 30)).unwrap();
        service.ingest(&records);

        let query = PredictQuery::at_parts(12.9352, 77.6245, 14, 2, 6);
        let result = service.predict(&query).unwrap();

        let expected_cell = service.grid.index(12.9352, 77.6245).unwrap();
        assert_eq!(result.cell_id, expected_cell.to_string());
        assert!(result.predicted_demand >= 0.0);
        assert_eq!(
            result.demand_level,
            service.thresholds.classify(result.predicted_demand)
        );
        assert_eq!((result.hour, result.day_of_week, result.month), (14, 2, 6));
    }

    #[test]
    fn test_artifact_round_trip_predicts_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let artifact = trained_artifact(24 * 30);
        artifact.save(&path).unwrap();

        let in_memory = service();
        in_memory.install_trained(artifact).unwrap();
        let from_disk = service();
        from_disk.load(&path).unwrap();
        assert_eq!(from_disk.state(), ServiceState::Ready);

        let query = PredictQuery::at_parts(12.9352, 77.6245, 14, 2, 6);
        let a = in_memory.predict(&query).unwrap();
        let b = from_disk.predict(&query).unwrap();
        assert!((a.predicted_demand - b.predicted_demand).abs() < 1e-6);
        assert_eq!(a.demand_level, b.demand_level);
    }

    #[test]
    fn test_schema_drift_is_rejected_at_load() {
        // artifact trained under a different lag configuration
        let drifted = FeatureAssembler::new(Arc::new(LagConfig {
            offsets_hours: vec![1, 24],
            windows_hours: vec![3],
            default_value: 0.0,
        }));
        let artifact = train(&synthetic_records(24 * 10), &drifted, &quick_trainer()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        artifact.save(&path).unwrap();

        let service = service();
        let result = service.load(&path);
        assert!(matches!(
            result,
            Err(ForecastError::SchemaMismatch { .. })
        ));
        assert_eq!(service.state(), ServiceState::LoadFailed);

        // LoadFailed is terminal: predicts are rejected, reloads refused
        let query = PredictQuery::at_parts(12.9352, 77.6245, 14, 2, 6);
        assert!(matches!(
            service.predict(&query),
            Err(ForecastError::ServiceUnavailable(_))
        ));
        assert!(service.reload(&path).is_err());
    }

    #[test]
    fn test_failed_reload_keeps_serving_the_old_model() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        trained_artifact(24 * 30).save(&good).unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, b"not a model artifact").unwrap();

        let service = service();
        service.load(&good).unwrap();
        assert!(service.reload(&bad).is_err());
        assert_eq!(service.state(), ServiceState::Ready);

        let query = PredictQuery::at_parts(12.9352, 77.6245, 14, 2, 6);
        assert!(service.predict(&query).is_ok());
    }

    #[test]
    fn test_concurrent_predicts_during_reload_see_whole_models() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        trained_artifact(24 * 20).save(&first).unwrap();
        trained_artifact(24 * 40).save(&second).unwrap();

        let service = Arc::new(service());
        service.load(&first).unwrap();

        let query = PredictQuery::at_parts(12.9352, 77.6245, 14, 2, 6);
        let old_value = service.predict(&query).unwrap().predicted_demand;
        service.reload(&second).unwrap();
        let new_value = service.predict(&query).unwrap().predicted_demand;

        // swap back and forth under concurrent readers
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let service = Arc::clone(&service);
                let query = query.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let value = service.predict(&query).unwrap().predicted_demand;
                        assert!(
                            (value - old_value).abs() < 1e-9 || (value - new_value).abs() < 1e-9,
                            "prediction {value} matches neither installed model"
                        );
                    }
                })
            })
            .collect();
        for _ in 0..20 {
            service.reload(&first).unwrap();
            service.reload(&second).unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn test_shutdown_stops_serving() {
        let service = service();
        service.install_trained(trained_artifact(24 * 10)).unwrap();
        service.shutdown();
        assert_eq!(service.state(), ServiceState::Shutdown);
        let query = PredictQuery::at_parts(12.9352, 77.6245, 14, 2, 6);
        assert!(matches!(
            service.predict(&query),
            Err(ForecastError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_health_reports_readiness() {
        let service = service();
        let health = service.health();
        assert_eq!(health.state, ServiceState::Unloaded);
        assert!(!health.model_loaded);

        service.install_trained(trained_artifact(24 * 10)).unwrap();
        let health = service.health();
        assert_eq!(health.state, ServiceState::Ready);
        assert!(health.model_loaded);
        assert_eq!(health.schema_version, Some(1));
    }
}
