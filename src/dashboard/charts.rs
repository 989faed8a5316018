//! Chart generation and rendering for the dashboard.
//!
//! The category totals chart is generated as JSON configuration for the
//! ECharts library and rendered with an HTML container and JavaScript
//! initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{dashboard::aggregation::aggregate_by_category, expense::Expense, html::HeadElement};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML container for a dashboard chart.
pub(super) fn chart_view(chart: &DashboardChart) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div
                id=(chart.id)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// Generates JavaScript initialization code for a dashboard chart.
///
/// Creates a script that initializes an ECharts instance with dark mode
/// support and responsive resizing.
pub(super) fn chart_script(chart: &DashboardChart) -> HeadElement {
    let script_content = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#,
        chart.id, chart.options
    );

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A bar chart with one bar per category showing the summed expense amounts.
pub(super) fn category_totals_chart(expenses: &[Expense]) -> Chart {
    let (labels, values) = aggregate_by_category(expenses);

    Chart::new()
        .title(Title::new().text("Spending by category"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Total").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod chart_tests {
    use time::macros::date;

    use crate::{expense::Expense, user::UserID};

    use super::category_totals_chart;

    #[test]
    fn chart_options_contain_labels_and_totals() {
        let expenses = vec![
            Expense {
                id: 1,
                title: "Lunch".to_owned(),
                amount: 10.0,
                category: "Food".to_owned(),
                date: date!(2025 - 10 - 05),
                notes: String::new(),
                user_id: UserID::new(1),
            },
            Expense {
                id: 2,
                title: "Dinner".to_owned(),
                amount: 5.0,
                category: "Food".to_owned(),
                date: date!(2025 - 10 - 05),
                notes: String::new(),
                user_id: UserID::new(1),
            },
            Expense {
                id: 3,
                title: "Train ticket".to_owned(),
                amount: 20.0,
                category: "Travel".to_owned(),
                date: date!(2025 - 10 - 05),
                notes: String::new(),
                user_id: UserID::new(1),
            },
        ];

        let options = category_totals_chart(&expenses).to_string();

        assert!(options.contains("\"Food\""));
        assert!(options.contains("\"Travel\""));
        assert!(options.contains("15.0"));
        assert!(options.contains("20.0"));
    }
}
