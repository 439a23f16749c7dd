//! Database module - read-only access to a GymUp SQLite export

pub mod catalog;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OpenFlags, params};
use serde::Serialize;
use tracing::info;

use crate::session::{SessionRecord, SetRecord};

/// Exercise template that appears in at least one workout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseInfo {
    pub id: i64,
    pub name: String,
    pub muscle_group: &'static str,
    pub equipment: &'static str,
}

/// Totals across every performed training
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_trainings: u32,
    pub total_tonnage: f64,
    pub total_sets: i64,
    pub total_reps: i64,
    pub week_trainings: u32,
    pub week_tonnage: f64,
    pub month_trainings: u32,
    pub month_tonnage: f64,
}

/// Tonnage attributed to one primary muscle group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MuscleVolume {
    pub muscle_group: &'static str,
    pub tonnage: f64,
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an existing database without write access
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("opening database {}", path.display()))?;
        info!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    /// Exercises used in workouts, named ones first, then by name
    pub fn used_exercises(&self) -> Result<Vec<ExerciseInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT _id, name, mainMuscleWorked, equipment FROM th_exercise
             WHERE _id IN (SELECT DISTINCT th_exercise_id FROM workout WHERE th_exercise_id IS NOT NULL)
             ORDER BY (name IS NULL OR TRIM(name) = ''), name, _id",
        )?;

        let exercises = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let name: Option<String> = row.get(1)?;
                let muscle: Option<i64> = row.get(2)?;
                let equipment: Option<i64> = row.get(3)?;
                Ok(ExerciseInfo {
                    id,
                    name: catalog::display_name(id, name.as_deref(), muscle, equipment),
                    muscle_group: catalog::muscle_name(muscle),
                    equipment: catalog::equipment_name(equipment),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }

    /// First used exercise whose name contains `query`, ignoring case
    pub fn find_exercise(&self, query: &str) -> Result<Option<ExerciseInfo>> {
        let needle = query.trim().to_lowercase();
        let found = self
            .used_exercises()?
            .into_iter()
            .find(|e| e.name.to_lowercase().contains(&needle));
        Ok(found)
    }

    /// Training totals overall, for the last 7 days and for the last 30 days
    pub fn overview_stats(&self, now: DateTime<Utc>) -> Result<OverviewStats> {
        let (total_trainings, total_tonnage, total_sets, total_reps) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(tonnage), 0), COALESCE(SUM(setsAmount), 0), COALESCE(SUM(repsAmount), 0)
             FROM training WHERE finishDateTime > 0",
            [],
            |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, f64>(3)?,
                ))
            },
        )?;

        let (week_trainings, week_tonnage) = self.trainings_since(now - Duration::days(7))?;
        let (month_trainings, month_tonnage) = self.trainings_since(now - Duration::days(30))?;

        Ok(OverviewStats {
            total_trainings,
            total_tonnage,
            total_sets,
            total_reps: total_reps as i64,
            week_trainings,
            week_tonnage,
            month_trainings,
            month_tonnage,
        })
    }

    fn trainings_since(&self, since: DateTime<Utc>) -> Result<(u32, f64)> {
        let counts = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(tonnage), 0) FROM training
             WHERE finishDateTime > 0 AND startDateTime >= ?1",
            [since.timestamp_millis()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(counts)
    }

    /// Workout tonnage per primary muscle since `since`, largest first
    pub fn muscle_volume(&self, since: DateTime<Utc>) -> Result<Vec<MuscleVolume>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.mainMuscleWorked, COALESCE(SUM(w.tonnage), 0)
             FROM workout w
             JOIN training t ON w.training_id = t._id
             JOIN th_exercise e ON w.th_exercise_id = e._id
             WHERE t.startDateTime >= ?1 AND t.finishDateTime > 0 AND e.mainMuscleWorked > 0
             GROUP BY e.mainMuscleWorked",
        )?;
        let rows = stmt
            .query_map([since.timestamp_millis()], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // Unassigned ids all land in "Unknown"
        let mut by_muscle: BTreeMap<&'static str, f64> = BTreeMap::new();
        for (muscle, tonnage) in rows {
            *by_muscle.entry(catalog::muscle_name(Some(muscle))).or_default() += tonnage;
        }

        let mut volume: Vec<MuscleVolume> = by_muscle
            .into_iter()
            .map(|(muscle_group, tonnage)| MuscleVolume { muscle_group, tonnage })
            .collect();
        volume.sort_by(|a, b| b.tonnage.total_cmp(&a.tonnage));
        Ok(volume)
    }

    /// Performed workouts of one exercise started at or after `since`, oldest first
    pub fn exercise_history(&self, exercise_id: i64, since: DateTime<Utc>) -> Result<Vec<SessionRecord>> {
        let mut workouts = self.conn.prepare(
            "SELECT w._id, t.startDateTime, w.tonnage, w.hard_sense
             FROM workout w JOIN training t ON w.training_id = t._id
             WHERE w.th_exercise_id = ?1 AND t.startDateTime >= ?2 AND t.finishDateTime > 0
             ORDER BY t.startDateTime, w._id",
        )?;
        let rows = workouts
            .query_map(params![exercise_id, since.timestamp_millis()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut sets_stmt = self.conn.prepare(
            "SELECT weight, reps, hard_sense, _id FROM set_ WHERE workout_id = ?1 ORDER BY _id",
        )?;

        let mut history = Vec::with_capacity(rows.len());
        for (workout_id, start_ms, tonnage, rpe_avg) in rows {
            let sets = sets_stmt
                .query_map([workout_id], |row| {
                    let reps: Option<f64> = row.get(1)?;
                    Ok(SetRecord {
                        weight: row.get(0)?,
                        // Stored as REAL; partial reps are dropped
                        reps: reps.map(|r| r as u32),
                        rpe: row.get(2)?,
                        order: Some(row.get(3)?),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            history.push(SessionRecord {
                date: start_ms
                    .filter(|ms| *ms > 0)
                    .and_then(DateTime::from_timestamp_millis),
                sets,
                // GymUp writes 0 until the workout is summarised
                tonnage: tonnage.filter(|t| *t > 0.0),
                rpe_avg,
            });
        }

        info!(exercise_id, sessions = history.len(), "loaded exercise history");
        Ok(history)
    }
}
