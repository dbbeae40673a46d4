use booking_form::form::{FieldLens, FormModel};

#[derive(Clone, booking_form::form::FormModel)]
struct CallbackForm {
    phone: String,
    notes: Option<String>,
}

fn main() {
    let fields = CallbackForm::fields();
    let lens = fields.phone();
    let mut model = CallbackForm {
        phone: "0300-1234567".to_string(),
        notes: None,
    };
    lens.set(&mut model, "+92 300-1234567".to_string());
    assert_eq!(lens.key().as_str(), "phone");
    assert_eq!(lens.get(&model), "+92 300-1234567");

    let values = model.to_values();
    assert_eq!(values.get("notes").map(String::as_str), Some(""));
    let restored = CallbackForm::from_values(&values);
    assert_eq!(restored.phone, model.phone);
    assert_eq!(restored.notes, None);
}
