// Line-oriented menu over any reader/writer pair.
//
// 1) Students 2) Courses 3) Enrollment 4) Export & backup 0) Exit

use anyhow::{Context, Result};
use course_registry::{
    store, AppConfig, BackupService, Course, CourseRegistry, CourseSpec, EnrollmentService,
    StudentRegistry,
};
use std::io::{BufRead, Write};

pub struct Menu<R, W> {
    input: R,
    output: W,
    config: AppConfig,
    students: StudentRegistry,
    courses: CourseRegistry,
    enrollment: EnrollmentService,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, config: AppConfig) -> Self {
        let enrollment = EnrollmentService::new(config.max_credits);
        Menu {
            input,
            output,
            config,
            students: StudentRegistry::new(),
            courses: CourseRegistry::new(),
            enrollment,
        }
    }

    /// Loop until "0" or end of input
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(
                self.output,
                "\n1) Students 2) Courses 3) Enrollment 4) Export & backup 0) Exit"
            )?;
            let Some(choice) = self.read_line()? else {
                break;
            };
            match choice.as_str() {
                "1" => self.manage_students()?,
                "2" => self.manage_courses()?,
                "3" => self.manage_enrollment()?,
                "4" => self.export_and_backup()?,
                "0" => break,
                _ => writeln!(self.output, "Invalid")?,
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    fn manage_students(&mut self) -> Result<()> {
        for student in self.students.list_all() {
            writeln!(self.output, "{}", student.profile())?;
        }
        if !self.confirm("Add student? (y/n):")? {
            return Ok(());
        }

        let reg_no = self.ask("RegNo:")?;
        let name = self.ask("Name:")?;
        let email = self.ask("Email:")?;
        self.students.add(&reg_no, &name, &email);
        Ok(())
    }

    fn manage_courses(&mut self) -> Result<()> {
        for course in self.courses.list_all() {
            writeln!(self.output, "{}", course)?;
        }
        if !self.confirm("Add course? (y/n):")? {
            return Ok(());
        }

        let code = self.ask("Code:")?;
        let title = self.ask("Title:")?;
        let credits = self.ask("Credits:")?;
        let Ok(credits) = credits.parse::<u32>() else {
            writeln!(self.output, "Invalid credits: {}", credits)?;
            return Ok(());
        };

        match Course::new(CourseSpec {
            title,
            credits,
            ..CourseSpec::new(code)
        }) {
            Ok(course) => {
                self.courses.add(course);
            }
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }

    fn manage_enrollment(&mut self) -> Result<()> {
        let reg_no = self.ask("Student regNo:")?;
        let Some(student) = self.students.find_by_registration_number(&reg_no) else {
            writeln!(self.output, "Not found")?;
            return Ok(());
        };
        let code = self.ask("Course code:")?;
        let Some(course) = self.courses.find_by_code(&code) else {
            writeln!(self.output, "Not found")?;
            return Ok(());
        };

        match self.enrollment.enroll(&student, &course) {
            Ok(_) => writeln!(self.output, "Enrolled.")?,
            Err(e) => writeln!(self.output, "{}", e)?,
        }

        if self.confirm("Marks? (y/n):")? {
            let marks = self.ask("Enter marks:")?;
            match marks.parse::<f64>() {
                Ok(marks) => self.enrollment.record_marks(&student, &course, marks),
                Err(_) => writeln!(self.output, "Invalid marks: {}", marks)?,
            }
        }

        writeln!(self.output, "{}", student.transcript())?;
        Ok(())
    }

    fn export_and_backup(&mut self) -> Result<()> {
        let export_dir = store::export_snapshot(&self.config.data_dir, &self.students, &self.courses)
            .context("failed to export registries")?;
        let backup = BackupService::from_config(&self.config)
            .backup_directory(&export_dir)
            .context("failed to back up export")?;

        writeln!(self.output, "Exported to {}", export_dir.display())?;
        writeln!(self.output, "Backup written to {}", backup.display())?;
        Ok(())
    }

    // ========================================================================
    // PROMPT HELPERS
    // ========================================================================

    /// Next trimmed line, None at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.ask(prompt)?.eq_ignore_ascii_case("y"))
    }
}
