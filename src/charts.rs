//! Chart-set rendering via the `plotters` bitmap backend.
//!
//! Four PNG artifacts mirror the aggregate bundle: a 2x2 sales overview,
//! customer/geography bars, temporal patterns with a month-by-year
//! heatmap, and product performance with a correlation heatmap. Styling
//! is not contractual; every drawn value comes from [`AnalysisResult`].

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::aggregate::AnalysisResult;
use crate::errors::AnalysisError;

type DrawResult = Result<(), Box<dyn Error>>;

/// Render the sales overview chart set (trend + moving average,
/// quarterly bars, product-line totals, deal-size distribution).
pub fn sales_overview(path: &Path, analysis: &AnalysisResult) -> Result<(), AnalysisError> {
    draw_sales_overview(path, analysis).map_err(|e| AnalysisError::Chart(e.to_string()))
}

/// Render the customer and geography chart set.
pub fn customer_geography(path: &Path, analysis: &AnalysisResult) -> Result<(), AnalysisError> {
    draw_customer_geography(path, analysis).map_err(|e| AnalysisError::Chart(e.to_string()))
}

/// Render the temporal patterns chart set (weekday means + heatmap).
pub fn temporal_patterns(path: &Path, analysis: &AnalysisResult) -> Result<(), AnalysisError> {
    draw_temporal_patterns(path, analysis).map_err(|e| AnalysisError::Chart(e.to_string()))
}

/// Render the product analysis chart set (performance + correlations).
pub fn product_analysis(path: &Path, analysis: &AnalysisResult) -> Result<(), AnalysisError> {
    draw_product_analysis(path, analysis).map_err(|e| AnalysisError::Chart(e.to_string()))
}

fn draw_sales_overview(path: &Path, analysis: &AnalysisResult) -> DrawResult {
    let root = BitMapBackend::new(path, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    // Monthly sales trend with moving average.
    {
        let totals = &analysis.temporal.monthly_totals;
        let span = totals.len().max(1) as f64;
        let top = axis_top(totals.iter().map(|(_, sum)| *sum));
        let mut chart = ChartBuilder::on(&panels[0])
            .caption("Monthly Sales Trend with Moving Average", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(0f64..span, 0f64..top)?;
        chart
            .configure_mesh()
            .x_desc("Month")
            .y_desc("Total Sales ($)")
            .x_label_formatter(&|x: &f64| {
                let index = x.round() as usize;
                totals
                    .get(index)
                    .map(|((year, month), _)| format!("{year}-{month:02}"))
                    .unwrap_or_default()
            })
            .draw()?;
        chart
            .draw_series(LineSeries::new(
                totals
                    .iter()
                    .enumerate()
                    .map(|(index, (_, sum))| (index as f64, *sum)),
                &BLUE,
            ))?
            .label("Monthly Sales")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
        chart.draw_series(
            totals
                .iter()
                .enumerate()
                .map(|(index, (_, sum))| Circle::new((index as f64, *sum), 3, BLUE.filled())),
        )?;
        let averaged: Vec<(f64, f64)> = analysis
            .temporal
            .moving_average
            .iter()
            .enumerate()
            .filter_map(|(index, value)| value.map(|v| (index as f64, v)))
            .collect();
        chart
            .draw_series(LineSeries::new(averaged, &RED))?
            .label("3-Month Moving Average")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
        chart.configure_series_labels().border_style(BLACK).draw()?;
    }

    // Quarterly sales by year.
    {
        let quarters: Vec<(String, f64)> = analysis
            .temporal
            .quarterly
            .iter()
            .map(|((year, quarter), stats)| (format!("{year} Q{quarter}"), stats.sum))
            .collect();
        draw_bar_panel(
            &panels[1],
            "Quarterly Sales by Year",
            "Sales ($)",
            &quarters,
            GREEN,
        )?;
    }

    // Sales by product line.
    {
        let lines: Vec<(String, f64)> = analysis
            .product_lines
            .iter()
            .map(|(line, stats)| (line.clone(), stats.sales.sum))
            .collect();
        draw_bar_panel(
            &panels[2],
            "Sales by Product Line",
            "Total Sales ($)",
            &lines,
            BLUE,
        )?;
    }

    // Deal-size distribution with average sales overlay.
    {
        let tiers: Vec<(String, usize, f64)> = analysis
            .deal_sizes
            .iter()
            .map(|(tier, stats)| (tier.clone(), stats.count, stats.sales_mean))
            .collect();
        let span = tiers.len().max(1) as f64;
        let count_top = axis_top(tiers.iter().map(|(_, count, _)| *count as f64));
        let mean_top = axis_top(tiers.iter().map(|(_, _, mean)| *mean));
        let mut chart = ChartBuilder::on(&panels[3])
            .caption("Deal Size Distribution and Average Sales", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .right_y_label_area_size(80)
            .build_cartesian_2d(0f64..span, 0f64..count_top)?
            .set_secondary_coord(0f64..span, 0f64..mean_top);
        chart
            .configure_mesh()
            .x_desc("Deal Size")
            .y_desc("Count")
            .x_label_formatter(&|x: &f64| {
                let index = x.floor() as usize;
                tiers
                    .get(index)
                    .map(|(tier, _, _)| tier.clone())
                    .unwrap_or_default()
            })
            .draw()?;
        chart
            .configure_secondary_axes()
            .y_desc("Average Sales ($)")
            .draw()?;
        chart.draw_series(tiers.iter().enumerate().map(|(index, (_, count, _))| {
            Rectangle::new(
                [
                    (index as f64 + 0.15, 0.0),
                    (index as f64 + 0.85, *count as f64),
                ],
                BLUE.mix(0.6).filled(),
            )
        }))?;
        chart.draw_secondary_series(LineSeries::new(
            tiers
                .iter()
                .enumerate()
                .map(|(index, (_, _, mean))| (index as f64 + 0.5, *mean)),
            &RED,
        ))?;
        chart.draw_secondary_series(
            tiers
                .iter()
                .enumerate()
                .map(|(index, (_, _, mean))| Circle::new((index as f64 + 0.5, *mean), 4, RED.filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

fn draw_customer_geography(path: &Path, analysis: &AnalysisResult) -> DrawResult {
    let root = BitMapBackend::new(path, (1600, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    let customers: Vec<(String, f64)> = analysis
        .top_customers
        .iter()
        .map(|customer| (customer.name.clone(), customer.total_sales))
        .collect();
    draw_bar_panel(
        &panels[0],
        "Top 10 Customers by Sales",
        "Total Sales ($)",
        &customers,
        BLUE,
    )?;

    let countries: Vec<(String, f64)> = analysis
        .countries
        .iter()
        .map(|(country, stats)| (country.clone(), stats.sales_sum))
        .collect();
    draw_bar_panel(
        &panels[1],
        "Sales by Country",
        "Total Sales ($)",
        &countries,
        GREEN,
    )?;

    root.present()?;
    Ok(())
}

fn draw_temporal_patterns(path: &Path, analysis: &AnalysisResult) -> DrawResult {
    let root = BitMapBackend::new(path, (1600, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    let weekdays: Vec<(String, f64)> = analysis
        .temporal
        .by_weekday
        .iter()
        .map(|(day, stats)| (day.clone(), stats.mean))
        .collect();
    draw_bar_panel(
        &panels[0],
        "Average Sales by Day of Week",
        "Average Sales ($)",
        &weekdays,
        BLUE,
    )?;

    // Month-by-year heatmap of summed sales.
    {
        let pivot = &analysis.temporal.pivot;
        let year_span = pivot.years.len().max(1) as f64;
        let peak = axis_top(
            pivot
                .sums
                .iter()
                .flatten()
                .filter_map(|cell| *cell),
        );
        let mut chart = ChartBuilder::on(&panels[1])
            .caption("Monthly Sales Heatmap by Year", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..year_span, 0f64..12f64)?;
        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Month")
            .x_label_formatter(&|x: &f64| {
                let index = x.floor() as usize;
                pivot
                    .years
                    .get(index)
                    .map(|year| year.to_string())
                    .unwrap_or_default()
            })
            .y_label_formatter(&|y: &f64| format!("{}", y.floor() as u32 + 1))
            .draw()?;
        let mut cells = Vec::new();
        for (month_index, row) in pivot.sums.iter().enumerate() {
            for (year_index, cell) in row.iter().enumerate() {
                if let Some(sum) = cell {
                    cells.push(Rectangle::new(
                        [
                            (year_index as f64, month_index as f64),
                            (year_index as f64 + 1.0, month_index as f64 + 1.0),
                        ],
                        heat_color(sum / peak).filled(),
                    ));
                }
            }
        }
        chart.draw_series(cells)?;
    }

    root.present()?;
    Ok(())
}

fn draw_product_analysis(path: &Path, analysis: &AnalysisResult) -> DrawResult {
    let root = BitMapBackend::new(path, (1600, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    // Product line sales with mean profit margin overlay.
    {
        let lines: Vec<(String, f64, f64)> = analysis
            .product_lines
            .iter()
            .map(|(line, stats)| {
                (
                    line.clone(),
                    stats.sales.sum,
                    stats.mean_profit_margin.unwrap_or_default(),
                )
            })
            .collect();
        let span = lines.len().max(1) as f64;
        let sales_top = axis_top(lines.iter().map(|(_, sum, _)| *sum));
        let margin_top = axis_top(lines.iter().map(|(_, _, margin)| *margin));
        let mut chart = ChartBuilder::on(&panels[0])
            .caption("Product Line Performance", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(90)
            .right_y_label_area_size(60)
            .build_cartesian_2d(0f64..span, 0f64..sales_top)?
            .set_secondary_coord(0f64..span, 0f64..margin_top);
        chart
            .configure_mesh()
            .x_desc("Product Line")
            .y_desc("Total Sales ($)")
            .x_label_formatter(&|x: &f64| {
                let index = x.floor() as usize;
                lines
                    .get(index)
                    .map(|(line, _, _)| line.clone())
                    .unwrap_or_default()
            })
            .draw()?;
        chart
            .configure_secondary_axes()
            .y_desc("Average Profit Margin (%)")
            .draw()?;
        chart.draw_series(lines.iter().enumerate().map(|(index, (_, sum, _))| {
            Rectangle::new(
                [(index as f64 + 0.15, 0.0), (index as f64 + 0.85, *sum)],
                BLUE.mix(0.7).filled(),
            )
        }))?;
        chart.draw_secondary_series(LineSeries::new(
            lines
                .iter()
                .enumerate()
                .map(|(index, (_, _, margin))| (index as f64 + 0.5, *margin)),
            &RED,
        ))?;
    }

    // Correlation heatmap.
    {
        let matrix = &analysis.correlations;
        let span = matrix.fields.len().max(1) as f64;
        let mut chart = ChartBuilder::on(&panels[1])
            .caption("Correlation Matrix of Key Metrics", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(120)
            .build_cartesian_2d(0f64..span, 0f64..span)?;
        chart
            .configure_mesh()
            .x_label_formatter(&|x: &f64| field_label(matrix.fields.as_slice(), *x))
            .y_label_formatter(&|y: &f64| field_label(matrix.fields.as_slice(), *y))
            .draw()?;
        let mut cells = Vec::new();
        for row in 0..matrix.fields.len() {
            for column in 0..matrix.fields.len() {
                let style = match matrix.get(row, column) {
                    Some(r) => correlation_color(r).filled(),
                    // Missing correlations render as neutral grey.
                    None => RGBColor(200, 200, 200).filled(),
                };
                cells.push(Rectangle::new(
                    [
                        (column as f64, row as f64),
                        (column as f64 + 1.0, row as f64 + 1.0),
                    ],
                    style,
                ));
            }
        }
        chart.draw_series(cells)?;
    }

    root.present()?;
    Ok(())
}

/// Vertical bar panel over labeled values; shared by the simple charts.
fn draw_bar_panel(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    title: &str,
    y_desc: &str,
    values: &[(String, f64)],
    color: RGBColor,
) -> DrawResult {
    let span = values.len().max(1) as f64;
    let top = axis_top(values.iter().map(|(_, value)| *value));
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(0f64..span, 0f64..top)?;
    chart
        .configure_mesh()
        .y_desc(y_desc)
        .x_label_formatter(&|x: &f64| {
            let index = x.floor() as usize;
            values
                .get(index)
                .map(|(label, _)| label.clone())
                .unwrap_or_default()
        })
        .draw()?;
    chart.draw_series(values.iter().enumerate().map(|(index, (_, value))| {
        Rectangle::new(
            [(index as f64 + 0.15, 0.0), (index as f64 + 0.85, *value)],
            color.mix(0.7).filled(),
        )
    }))?;
    Ok(())
}

fn field_label(fields: &[String], position: f64) -> String {
    let index = position.floor() as usize;
    fields.get(index).cloned().unwrap_or_default()
}

/// Upper axis bound with headroom; at least 1 so empty panels still draw.
fn axis_top(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(1.0f64, f64::max) * 1.1
}

/// Yellow-to-red ramp over a normalized 0..1 intensity.
fn heat_color(intensity: f64) -> RGBColor {
    let clamped = intensity.clamp(0.0, 1.0);
    RGBColor(255, (220.0 * (1.0 - clamped)) as u8 + 35, 40)
}

/// Blue (-1) through white (0) to red (+1).
fn correlation_color(r: f64) -> RGBColor {
    let clamped = r.clamp(-1.0, 1.0);
    if clamped >= 0.0 {
        let fade = (255.0 * (1.0 - clamped)) as u8;
        RGBColor(255, fade, fade)
    } else {
        let fade = (255.0 * (1.0 + clamped)) as u8;
        RGBColor(fade, fade, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_color_spans_the_ramp() {
        assert_eq!(heat_color(0.0), RGBColor(255, 255, 40));
        assert_eq!(heat_color(1.0), RGBColor(255, 35, 40));
    }

    #[test]
    fn correlation_color_is_white_at_zero() {
        assert_eq!(correlation_color(0.0), RGBColor(255, 255, 255));
        assert_eq!(correlation_color(1.0), RGBColor(255, 0, 0));
        assert_eq!(correlation_color(-1.0), RGBColor(0, 0, 255));
    }

    #[test]
    fn axis_top_has_floor_and_headroom() {
        assert!((axis_top(std::iter::empty()) - 1.1).abs() < 1e-9);
        assert!((axis_top([10.0].into_iter()) - 11.0).abs() < 1e-9);
    }
}
