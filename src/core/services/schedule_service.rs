use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::core::history;
use crate::core::services::{
    duplicate_name, ensure_non_blank, LibraryService, ServiceError, ServiceResult,
};
use crate::domain::cashbook::Cashbook;
use crate::domain::schedule::Schedule;
use crate::domain::undo::UndoableEntity;

/// Standing generators that stamp library templates on an interval.
pub struct ScheduleService;

impl ScheduleService {
    pub fn add(book: &mut Cashbook, schedule: Schedule) -> ServiceResult<Uuid> {
        validate_schedule(book, &schedule, None)?;
        Ok(book.insert_schedule(schedule))
    }

    pub fn edit<F>(book: &mut Cashbook, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Schedule),
    {
        let Some(existing) = book.schedule(id) else {
            return Ok(());
        };
        let snapshot = existing.clone();
        let mut updated = snapshot.clone();
        mutator(&mut updated);
        validate_schedule(book, &updated, Some(id))?;
        updated.id = snapshot.id;
        updated.created_at = snapshot.created_at;
        updated.touch();
        book.schedules.insert(id, updated);
        book.touch();
        Ok(())
    }

    pub fn remove(book: &mut Cashbook, id: Uuid) -> ServiceResult<Option<Uuid>> {
        let Some(schedule) = book.remove_schedule(id) else {
            return Ok(None);
        };
        tracing::info!(%id, "deleting schedule");
        let label = format!("Deleted schedule \"{}\"", schedule.title);
        let history_id = history::push(book, label, UndoableEntity::Schedule(schedule));
        Ok(Some(history_id))
    }

    /// Stamps every due schedule once per elapsed occurrence, advancing
    /// `next_run` past `today`. A schedule whose template has since been
    /// removed is skipped with a warning and left due. Returns the ids of
    /// the stamped blocks.
    pub fn run_due(book: &mut Cashbook, today: NaiveDate) -> ServiceResult<Vec<Uuid>> {
        let due: Vec<Uuid> = book
            .schedules
            .values()
            .filter(|schedule| schedule.is_due(today))
            .map(|schedule| schedule.id)
            .collect();

        let mut stamped = Vec::new();
        for schedule_id in due {
            // Occurrences are bounded per run so a far-past `next_run`
            // cannot spin unchecked.
            let mut guard = 0usize;
            loop {
                let Some(schedule) = book.schedule(schedule_id) else {
                    break;
                };
                if !schedule.is_due(today) || guard >= 512 {
                    break;
                }
                let template_id = schedule.template_id;
                let run_date = schedule.next_run;
                let next = schedule.interval.next_date(run_date);
                match LibraryService::stamp(book, template_id, run_date)? {
                    Some(block_id) => stamped.push(block_id),
                    None => {
                        tracing::warn!(
                            %schedule_id,
                            %template_id,
                            "schedule skipped: template no longer in library"
                        );
                        break;
                    }
                }
                if let Some(schedule) = book.schedule_mut(schedule_id) {
                    schedule.next_run = next;
                    schedule.touch();
                }
                guard += 1;
            }
        }
        if !stamped.is_empty() {
            book.touch();
        }
        Ok(stamped)
    }

    /// Schedules sorted by next run date.
    pub fn list(book: &Cashbook) -> Vec<&Schedule> {
        let mut schedules: Vec<&Schedule> = book.schedules.values().collect();
        schedules.sort_by(|a, b| a.next_run.cmp(&b.next_run).then(a.id.cmp(&b.id)));
        schedules
    }
}

fn validate_schedule(
    book: &Cashbook,
    schedule: &Schedule,
    exclude: Option<Uuid>,
) -> ServiceResult<()> {
    ensure_non_blank(&schedule.title, "Schedule title")?;
    if schedule.interval.every == 0 {
        return Err(ServiceError::Invalid(
            "Schedule interval must be at least 1".into(),
        ));
    }
    if book.template(schedule.template_id).is_none() {
        return Err(ServiceError::Invalid(
            "Schedule must reference a library template".into(),
        ));
    }
    if duplicate_name(book.schedules.values(), exclude, &schedule.title) {
        return Err(ServiceError::Invalid(format!(
            "Schedule `{}` already exists",
            schedule.title
        )));
    }
    Ok(())
}
