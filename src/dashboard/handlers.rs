//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying the dashboard and creating expenses
//! - HTML view functions for rendering the dashboard UI
//! - The state type used by the handlers

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    dashboard::charts::{DashboardChart, category_totals_chart, chart_script, chart_view},
    endpoints,
    expense::{Category, Expense, create_expense, get_expenses_for_user},
    forms::{ExpenseFormData, FieldError, error_for, validate_expense},
    html::{
        BUTTON_PRIMARY_STYLE, HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, amount_input, base, format_currency, link,
        notice_banner, render, select_input, text_input, textarea_input,
    },
    user::{UserID, get_user_by_id},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the dashboard page.
#[derive(Deserialize, Default)]
pub struct DashboardQuery {
    /// Set after creating an expense to show an "expense added" notice.
    pub added: Option<String>,
}

fn expense_form(form_data: &ExpenseFormData, errors: &[FieldError]) -> Markup {
    let categories = Category::ALL.map(|category| category.as_str());

    html! {
        form
            method="post"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full max-w-md space-y-4 mb-8"
        {
            h2 class="text-xl font-bold" { "Add an expense" }

            (text_input(
                "Title",
                "title",
                "text",
                &form_data.title,
                error_for(errors, "title"),
            ))
            (amount_input("Amount", "amount", &form_data.amount, error_for(errors, "amount")))
            (select_input(
                "Category",
                "category",
                &categories,
                &form_data.category,
                error_for(errors, "category"),
            ))
            (text_input("Date", "date", "date", &form_data.date, error_for(errors, "date")))
            (textarea_input("Notes", "notes", &form_data.notes))

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Add expense"
            }
        }
    }
}

fn expense_table(expenses: &[Expense]) -> Markup {
    html! {
        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400 mb-8"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                }
            }

            tbody
            {
                @for expense in expenses
                {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (expense.title) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                        td class=(TABLE_CELL_STYLE) { (expense.category) }
                        td class=(TABLE_CELL_STYLE) { (expense.date) }
                        td class=(TABLE_CELL_STYLE) { (expense.notes) }
                    }
                }
            }
        }
    }
}

fn dashboard_page(
    username: &str,
    form_data: &ExpenseFormData,
    errors: &[FieldError],
    expenses: &[Expense],
    notice: Option<&str>,
) -> Markup {
    let chart = (!expenses.is_empty()).then(|| DashboardChart {
        id: "category-chart",
        options: category_totals_chart(expenses).to_string(),
    });

    let mut head_elements = Vec::new();
    if let Some(chart) = &chart {
        head_elements.push(HeadElement::ScriptLink("/static/echarts.min.js".to_owned()));
        head_elements.push(chart_script(chart));
    }

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-lg flex items-center justify-between mb-6"
            {
                h1 class="text-2xl font-bold" { "Hello, " (username) "!" }
                (link(endpoints::LOG_OUT, "Log out"))
            }

            @if let Some(notice) = notice {
                (notice_banner(notice))
            }

            div class="w-full max-w-screen-lg"
            {
                (expense_form(form_data, errors))

                @if expenses.is_empty() {
                    p class="text-gray-500 dark:text-gray-400" { "No expenses recorded yet." }
                } @else {
                    (expense_table(expenses))

                    @if let Some(chart) = &chart {
                        (chart_view(chart))
                    }
                }
            }
        }
    };

    base("Dashboard", &head_elements, &content)
}

/// Display the dashboard: the expense form, the expense table, and the
/// category totals chart for the logged-in user.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)?;
    let expenses = get_expenses_for_user(user_id, &connection)?;
    drop(connection);

    let notice = query.added.is_some().then_some("Expense added!");

    Ok(render(
        StatusCode::OK,
        dashboard_page(
            &user.username,
            &ExpenseFormData::default(),
            &[],
            &expenses,
            notice,
        ),
    ))
}

/// Handler for expense form submissions.
///
/// On success the expense is stored for the logged-in user and the client is
/// redirected back to the dashboard with an "expense added" notice. Otherwise
/// the dashboard is re-rendered with an error message next to each offending
/// field and nothing is persisted.
pub async fn post_create_expense(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<ExpenseFormData>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    match validate_expense(&form_data) {
        Ok(new_expense) => {
            let expense = create_expense(new_expense, user_id, &connection)?;
            tracing::info!("Created expense {} for user {}", expense.id, user_id);

            Ok(
                Redirect::to(&format!("{}?added=true", endpoints::DASHBOARD_VIEW))
                    .into_response(),
            )
        }
        Err(errors) => {
            let user = get_user_by_id(user_id, &connection)?;
            let expenses = get_expenses_for_user(user_id, &connection)?;

            Ok(render(
                StatusCode::UNPROCESSABLE_ENTITY,
                dashboard_page(&user.username, &form_data, &errors, &expenses, None),
            ))
        }
    }
}
