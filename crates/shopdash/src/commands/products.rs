//! Product command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use shopdash_core::{
    CoreError, EditFlow, Pagination, Product, ProductForm, ProductId, ProductsController, Route,
};

use crate::cli::{GlobalOpts, ProductFields, ProductPatch, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: ProductId,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            category: p.category.name.clone(),
            price: format!("${:.2}", p.price),
        }
    }
}

fn product_detail(p: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", p.id);
    let _ = writeln!(out, "Title:       {}", p.title);
    let _ = writeln!(out, "Price:       ${:.2}", p.price);
    let _ = writeln!(out, "Category:    {} ({})", p.category.name, p.category.id);
    let _ = writeln!(out, "Description: {}", p.description);
    for (i, image) in p.images.iter().enumerate() {
        let label = if i == 0 { "Images:" } else { "" };
        let _ = writeln!(out, "{label:<13}{image}");
    }
    out.trim_end().to_owned()
}

/// "Page 2 of 40 (200 products)  [ 1 2 (3) 4 5 ]" -- pages shown 1-based.
fn pager_line(p: &Pagination, window: &[u32]) -> String {
    let current = p.current_page();
    let pages: Vec<String> = window
        .iter()
        .map(|&n| {
            if n == current {
                format!("({})", n + 1)
            } else {
                (n + 1).to_string()
            }
        })
        .collect();
    format!(
        "Page {} of {} ({} products)  [ {} ]",
        current + 1,
        p.page_count(),
        p.total_count,
        pages.join(" ")
    )
}

fn form_from_fields(fields: ProductFields) -> ProductForm {
    ProductForm {
        title: fields.title,
        price: fields.price,
        description: fields.description,
        category_id: fields.category_id,
        images: fields.images,
    }
}

fn apply_patch(form: &mut ProductForm, patch: ProductPatch) {
    if let Some(title) = patch.title {
        form.title = title;
    }
    if let Some(price) = patch.price {
        form.price = price;
    }
    if let Some(description) = patch.description {
        form.description = description;
    }
    if let Some(category_id) = patch.category_id {
        form.category_id = category_id;
    }
    if !patch.images.is_empty() {
        form.images = patch.images;
    }
}

fn validate_form(form: &ProductForm) -> Result<(), CliError> {
    if form.title.trim().is_empty() {
        return Err(CliError::Validation {
            field: "title".into(),
            reason: "cannot be empty".into(),
        });
    }
    if !form.price.is_finite() || form.price <= 0.0 {
        return Err(CliError::Validation {
            field: "price".into(),
            reason: "must be a positive number".into(),
        });
    }
    Ok(())
}

fn product_not_found(id: ProductId) -> CliError {
    CliError::NotFound {
        resource_type: "product".into(),
        identifier: id.to_string(),
        list_command: "products list".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &ProductsController,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List { page } => {
            controller.load().await?;
            if page > 1 {
                controller.go_to_page(page - 1).await?;
            }

            let products = controller.products();
            let out = output::render_list(
                &global.output,
                &products,
                |p| ProductRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);

            let pagination = controller.pagination();
            if pagination.is_visible() && !global.quiet {
                eprintln!("{}", pager_line(&pagination, &controller.page_window()));
            }
            Ok(())
        }

        ProductsCommand::Get { id } => {
            controller.session().ensure().await;
            let product = controller.fetch_product(id).await.map_err(|e| match e {
                CoreError::NotFound { .. } => product_not_found(id),
                other => other.into(),
            })?;
            let out = output::render_single(&global.output, &product, product_detail, |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Add(fields) => {
            let form = form_from_fields(fields);
            validate_form(&form)?;
            controller.session().ensure().await;

            let result = controller.create(&form).await;
            output::print_alert(&controller.alerts().current(), &global.color, global.quiet);
            let product = result?;
            output::print_output(&product.id.to_string(), global.quiet);
            Ok(())
        }

        ProductsCommand::Edit { id, fields } => {
            controller.session().ensure().await;

            let flow = EditFlow::new(controller.clone());
            let id_param = id.to_string();
            flow.on_route(&Route::ready([("id", id_param.as_str())])).await;
            if flow.redirect().is_some() {
                return Err(product_not_found(id));
            }
            let Some(mut form) = flow.form() else {
                return Err(product_not_found(id));
            };

            apply_patch(&mut form, fields);
            validate_form(&form)?;

            let result = flow.submit(&form).await;
            output::print_alert(&controller.alerts().current(), &global.color, global.quiet);
            let product = result?;
            let out = output::render_single(&global.output, &product, product_detail, |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete product {id}? This cannot be undone."),
                "products delete",
                global.yes,
            )? {
                return Ok(());
            }
            controller.session().ensure().await;

            let result = controller.delete(id).await;
            output::print_alert(&controller.alerts().current(), &global.color, global.quiet);
            result?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_marks_current_page_one_based() {
        let p = Pagination {
            offset: 10,
            limit: 5,
            total_count: 200,
        };
        assert_eq!(
            pager_line(&p, &p.page_window(3)),
            "Page 3 of 40 (200 products)  [ 1 2 (3) 4 5 6 ]"
        );
    }

    #[test]
    fn patch_keeps_unset_fields() {
        let mut form = ProductForm {
            title: "Tee".into(),
            price: 10.0,
            description: "cotton".into(),
            category_id: 1,
            images: vec!["a.png".into()],
        };
        apply_patch(
            &mut form,
            ProductPatch {
                title: None,
                price: Some(12.5),
                description: None,
                category_id: None,
                images: Vec::new(),
            },
        );
        assert_eq!(form.title, "Tee");
        assert!((form.price - 12.5).abs() < f64::EPSILON);
        assert_eq!(form.images, vec!["a.png".to_string()]);
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let form = ProductForm {
            title: "Tee".into(),
            price: 0.0,
            ..ProductForm::default()
        };
        assert!(matches!(
            validate_form(&form),
            Err(CliError::Validation { ref field, .. }) if field == "price"
        ));
    }
}
