use std::cell::RefCell;

use super::prelude::*;

type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Debug, Default)]
pub struct MockDb {
    pub reports: RefCell<Vec<Report>>,
}

impl ReportRepo for MockDb {
    fn create_report(&self, report: Report) -> RepoResult<()> {
        if self.reports.borrow().iter().any(|r| r.id == report.id) {
            return Err(RepoError::AlreadyExists);
        }
        self.reports.borrow_mut().push(report);
        Ok(())
    }

    fn get_report(&self, id: &str) -> RepoResult<Report> {
        self.reports
            .borrow()
            .iter()
            .find(|r| r.id.as_str() == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    fn all_reports(&self) -> RepoResult<Vec<Report>> {
        Ok(self.reports.borrow().clone())
    }

    fn count_reports(&self) -> RepoResult<usize> {
        Ok(self.reports.borrow().len())
    }
}
