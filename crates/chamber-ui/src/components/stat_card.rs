use yew::{
  AttrValue,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
  pub label: AttrValue,
  pub value: usize,
  #[prop_or_default]
  pub tone:  Option<&'static str>
}

#[function_component(StatCard)]
pub fn stat_card(
  props: &StatCardProps
) -> Html {
  html! {
      <div class={classes!("stat-card", props.tone)}>
          <div class="stat-value">{ props.value }</div>
          <div class="stat-label">{ props.label.clone() }</div>
      </div>
  }
}
