//! Interactive text menu over the catalog services
//!
//! Resolves what the operator types (usernames, titles, dates) into users and
//! books, then calls the services. All rules live in the services; this layer
//! only prompts and prints.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        user::{CreateUser, UpdateUser},
    },
    services::Services,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    App(#[from] AppError),
}

type CliResult<T> = Result<T, CliError>;

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("Invalid date (expected YYYY-MM-DD): {}", value)))
}

fn parse_number(value: &str, what: &str) -> AppResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be an integer", what)))
}

pub struct Cli<R, W> {
    services: Services,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Cli<R, W> {
    pub fn new(services: Services, input: R, output: W) -> Self {
        Self {
            services,
            input,
            output,
        }
    }

    /// Run the main menu until the operator exits or input ends
    pub fn run(&mut self) -> io::Result<()> {
        match self.main_menu() {
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::debug!("Input closed, leaving menu");
                Ok(())
            }
            other => other,
        }
    }

    pub fn into_services(self) -> Services {
        self.services
    }

    fn main_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\nLibrary Management System")?;
            writeln!(self.output, "1. Manage Books")?;
            writeln!(self.output, "2. Manage Users")?;
            writeln!(self.output, "3. Manage Loans")?;
            writeln!(self.output, "4. Exit")?;

            match self.prompt("Enter your choice: ")?.as_str() {
                "1" => self.books_menu()?,
                "2" => self.users_menu()?,
                "3" => self.loans_menu()?,
                "4" => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn books_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\nManage Books")?;
            writeln!(self.output, "1. Add a book")?;
            writeln!(self.output, "2. Modify a book")?;
            writeln!(self.output, "3. Remove a book")?;
            writeln!(self.output, "4. Search for a book")?;
            writeln!(self.output, "5. Back to main menu")?;

            let outcome = match self.prompt("Enter your choice: ")?.as_str() {
                "1" => self.add_book(),
                "2" => self.modify_book(),
                "3" => self.remove_book(),
                "4" => self.search_books(),
                "5" => return Ok(()),
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    continue;
                }
            };
            self.report(outcome)?;
        }
    }

    fn users_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\nManage Users")?;
            writeln!(self.output, "1. Add a user")?;
            writeln!(self.output, "2. Modify a user")?;
            writeln!(self.output, "3. Remove a user")?;
            writeln!(self.output, "4. View user details")?;
            writeln!(self.output, "5. Back to main menu")?;

            let outcome = match self.prompt("Enter your choice: ")?.as_str() {
                "1" => self.add_user(),
                "2" => self.modify_user(),
                "3" => self.remove_user(),
                "4" => self.view_user(),
                "5" => return Ok(()),
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    continue;
                }
            };
            self.report(outcome)?;
        }
    }

    fn loans_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\nManage Loans")?;
            writeln!(self.output, "1. Borrow a book")?;
            writeln!(self.output, "2. Return a book")?;
            writeln!(self.output, "3. View user's borrowed books")?;
            writeln!(self.output, "4. View overdue books")?;
            writeln!(self.output, "5. Export overdue books as JSON")?;
            writeln!(self.output, "6. Back to main menu")?;

            let outcome = match self.prompt("Enter your choice: ")?.as_str() {
                "1" => self.borrow_book(),
                "2" => self.return_book(),
                "3" => self.view_user_loans(),
                "4" => self.view_overdue(),
                "5" => self.export_overdue(),
                "6" => return Ok(()),
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    continue;
                }
            };
            self.report(outcome)?;
        }
    }

    /// Print a service failure and carry on; only I/O errors leave the menu
    fn report(&mut self, outcome: CliResult<()>) -> io::Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(CliError::App(e)) => {
                tracing::debug!(error = %e, "Operation failed");
                writeln!(self.output, "Error [{}]: {}", e.code() as u32, e)
            }
            Err(CliError::Io(e)) => Err(e),
        }
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Resolve a title to one book, asking the operator to pick when several match
    fn select_book(&mut self, label: &str) -> CliResult<Book> {
        let title = self.prompt(label)?;
        let mut books = self.services.catalog().search_books(&BookQuery::Title(title));

        match books.len() {
            0 => Err(AppError::NotFound("No books found with that title".to_string()).into()),
            1 => Ok(books.remove(0)),
            count => {
                writeln!(self.output, "Multiple books found. Please choose one:")?;
                for (i, book) in books.iter().enumerate() {
                    writeln!(self.output, "{}. {} by {}", i + 1, book.title, book.author)?;
                }
                let choice = parse_number(&self.prompt("Enter the number of the book: ")?, "Choice")?;
                usize::try_from(choice)
                    .ok()
                    .filter(|c| (1..=count).contains(c))
                    .map(|c| books.remove(c - 1))
                    .ok_or_else(|| AppError::Validation(format!("Choice must be between 1 and {}", count)).into())
            }
        }
    }

    fn add_book(&mut self) -> CliResult<()> {
        let title = self.prompt("Enter book title: ")?;
        let author = self.prompt("Enter author name: ")?;
        let year = parse_number(&self.prompt("Enter publication year: ")?, "Year")?;
        let publisher = self.prompt("Enter publisher name: ")?;
        let num_copies = parse_number(&self.prompt("Enter number of copies: ")?, "Number of copies")?;
        let publication_date = parse_date(&self.prompt("Enter publication date (YYYY-MM-DD): ")?)?;

        let book = self.services.catalog().create_book(CreateBook {
            title,
            author,
            year,
            publisher,
            num_copies,
            publication_date,
        })?;
        writeln!(self.output, "Book added successfully (id {}).", book.id)?;
        Ok(())
    }

    fn modify_book(&mut self) -> CliResult<()> {
        let book = self.select_book("Enter the title of the book to modify: ")?;

        writeln!(self.output, "\nModify Book")?;
        writeln!(self.output, "1. Modify title")?;
        writeln!(self.output, "2. Modify author")?;
        writeln!(self.output, "3. Modify year")?;
        writeln!(self.output, "4. Modify publisher")?;
        writeln!(self.output, "5. Modify number of copies")?;
        writeln!(self.output, "6. Modify publication date")?;

        let update = match self.prompt("Enter your choice: ")?.as_str() {
            "1" => UpdateBook {
                title: Some(self.prompt("Enter new title: ")?),
                ..Default::default()
            },
            "2" => UpdateBook {
                author: Some(self.prompt("Enter new author: ")?),
                ..Default::default()
            },
            "3" => UpdateBook {
                year: Some(parse_number(&self.prompt("Enter new year: ")?, "Year")?),
                ..Default::default()
            },
            "4" => UpdateBook {
                publisher: Some(self.prompt("Enter new publisher: ")?),
                ..Default::default()
            },
            "5" => UpdateBook {
                num_copies: Some(parse_number(
                    &self.prompt("Enter new number of copies: ")?,
                    "Number of copies",
                )?),
                ..Default::default()
            },
            "6" => UpdateBook {
                publication_date: Some(parse_date(
                    &self.prompt("Enter new publication date (YYYY-MM-DD): ")?,
                )?),
                ..Default::default()
            },
            _ => {
                writeln!(self.output, "Invalid choice.")?;
                return Ok(());
            }
        };

        self.services.catalog().update_book(&book.id, update)?;
        writeln!(self.output, "Book modified successfully.")?;
        Ok(())
    }

    fn remove_book(&mut self) -> CliResult<()> {
        let title = self.prompt("Enter the title of the book to remove: ")?;
        self.services.catalog().remove_book(&title)?;
        writeln!(self.output, "Book removed successfully.")?;
        Ok(())
    }

    fn search_books(&mut self) -> CliResult<()> {
        writeln!(self.output, "\nSearch Book")?;
        writeln!(self.output, "1. Search by title")?;
        writeln!(self.output, "2. Search by author")?;
        writeln!(self.output, "3. Search by publisher")?;
        writeln!(self.output, "4. Search by publication date")?;

        let query = match self.prompt("Enter your choice: ")?.as_str() {
            "1" => BookQuery::Title(self.prompt("Enter title to search: ")?),
            "2" => BookQuery::Author(self.prompt("Enter author to search: ")?),
            "3" => BookQuery::Publisher(self.prompt("Enter publisher to search: ")?),
            "4" => BookQuery::PublicationDate(parse_date(
                &self.prompt("Enter publication date (YYYY-MM-DD) to search: ")?,
            )?),
            _ => {
                writeln!(self.output, "Invalid choice.")?;
                return Ok(());
            }
        };

        let results = self.services.catalog().search_books(&query);
        if results.is_empty() {
            writeln!(self.output, "No books found matching the search criteria.")?;
            return Ok(());
        }
        writeln!(self.output, "\nSearch Results:")?;
        for book in results {
            writeln!(
                self.output,
                "Title: {}, Author: {}, Year: {}, Available: {}/{}",
                book.title,
                book.author,
                book.year,
                book.available_copies(),
                book.num_copies
            )?;
        }
        Ok(())
    }

    fn add_user(&mut self) -> CliResult<()> {
        let username = self.prompt("Enter username: ")?;
        let firstname = self.prompt("Enter first name: ")?;
        let surname = self.prompt("Enter surname: ")?;
        let house_number = self.prompt("Enter house number: ")?;
        let street_name = self.prompt("Enter street name: ")?;
        let postcode = self.prompt("Enter postcode: ")?;
        let email = self.prompt("Enter email address: ")?;
        let date_of_birth = parse_date(&self.prompt("Enter date of birth (YYYY-MM-DD): ")?)?;

        self.services.users().create_user(CreateUser {
            username,
            firstname,
            surname,
            house_number,
            street_name,
            postcode,
            email,
            date_of_birth,
        })?;
        writeln!(self.output, "User added successfully.")?;
        Ok(())
    }

    fn modify_user(&mut self) -> CliResult<()> {
        let username = self.prompt("Enter the username of the user to modify: ")?;
        self.services.users().get_user(&username)?;

        writeln!(self.output, "\nModify User")?;
        writeln!(self.output, "1. Modify first name")?;
        writeln!(self.output, "2. Modify surname")?;
        writeln!(self.output, "3. Modify house number")?;
        writeln!(self.output, "4. Modify street name")?;
        writeln!(self.output, "5. Modify postcode")?;
        writeln!(self.output, "6. Modify email")?;

        let update = match self.prompt("Enter your choice: ")?.as_str() {
            "1" => UpdateUser {
                firstname: Some(self.prompt("Enter new first name: ")?),
                ..Default::default()
            },
            "2" => UpdateUser {
                surname: Some(self.prompt("Enter new surname: ")?),
                ..Default::default()
            },
            "3" => UpdateUser {
                house_number: Some(self.prompt("Enter new house number: ")?),
                ..Default::default()
            },
            "4" => UpdateUser {
                street_name: Some(self.prompt("Enter new street name: ")?),
                ..Default::default()
            },
            "5" => UpdateUser {
                postcode: Some(self.prompt("Enter new postcode: ")?),
                ..Default::default()
            },
            "6" => UpdateUser {
                email: Some(self.prompt("Enter new email address: ")?),
                ..Default::default()
            },
            _ => {
                writeln!(self.output, "Invalid choice.")?;
                return Ok(());
            }
        };

        self.services.users().update_user(&username, update)?;
        writeln!(self.output, "User modified successfully.")?;
        Ok(())
    }

    fn remove_user(&mut self) -> CliResult<()> {
        let firstname = self.prompt("Enter the first name of the user to remove: ")?;
        self.services.users().remove_user(&firstname)?;
        writeln!(self.output, "User removed successfully.")?;
        Ok(())
    }

    fn view_user(&mut self) -> CliResult<()> {
        let username = self.prompt("Enter the username of the user to view: ")?;
        let user = self.services.users().get_user(&username)?;

        writeln!(self.output, "\nUser Details:")?;
        writeln!(self.output, "Username: {}", user.username)?;
        writeln!(self.output, "Name: {}", user.full_name())?;
        writeln!(self.output, "Address: {}", user.address())?;
        writeln!(self.output, "Email: {}", user.email)?;
        writeln!(self.output, "Date of Birth: {}", user.date_of_birth.format(DATE_FORMAT))?;
        Ok(())
    }

    fn borrow_book(&mut self) -> CliResult<()> {
        let username = self.prompt("Enter the username of the borrower: ")?;
        self.services.users().get_user(&username)?;
        let book = self.select_book("Enter the title of the book to borrow: ")?;

        let due_date = self.services.loans().borrow(&username, &book.id)?;
        writeln!(
            self.output,
            "Book borrowed successfully. Due back on {}.",
            due_date.format(DATE_FORMAT)
        )?;
        Ok(())
    }

    fn return_book(&mut self) -> CliResult<()> {
        let username = self.prompt("Enter the username of the borrower: ")?;
        self.services.users().get_user(&username)?;
        let book = self.select_book("Enter the title of the book to return: ")?;

        self.services.loans().return_book(&username, &book.id)?;
        writeln!(self.output, "Book returned successfully.")?;
        Ok(())
    }

    fn view_user_loans(&mut self) -> CliResult<()> {
        let username = self.prompt("Enter the username to view borrowed books: ")?;
        let user = self.services.users().get_user(&username)?;
        let loans = self.services.loans().get_user_loans(&username)?;

        writeln!(
            self.output,
            "\n{} has borrowed {} book(s).",
            user.full_name(),
            loans.len()
        )?;
        if !loans.is_empty() {
            writeln!(self.output, "Borrowed books:")?;
        }
        for loan in loans {
            let title = self
                .services
                .repository()
                .books
                .get_by_id(&loan.book_id)
                .map(|b| b.title.clone())
                .unwrap_or_else(|_| "<removed>".to_string());
            writeln!(
                self.output,
                "Book ID: {} ({}), Due Date: {}",
                loan.book_id,
                title,
                loan.due_date.format(DATE_FORMAT)
            )?;
        }
        Ok(())
    }

    fn view_overdue(&mut self) -> CliResult<()> {
        let overdue = self.services.loans().overdue_loans()?;
        if overdue.is_empty() {
            writeln!(self.output, "No overdue books found.")?;
            return Ok(());
        }
        writeln!(self.output, "\nOverdue Books:")?;
        for loan in overdue {
            writeln!(
                self.output,
                "Username: {}, First Name: {}, Book ID: {}, Due Date: {}",
                loan.username,
                loan.firstname,
                loan.book_id,
                loan.due_date.format(DATE_FORMAT)
            )?;
        }
        Ok(())
    }

    fn export_overdue(&mut self) -> CliResult<()> {
        let overdue = self.services.loans().overdue_loans()?;
        let json = serde_json::to_string_pretty(&overdue)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(self.output, "{}", json)?;
        Ok(())
    }
}
