use std::fs;
use std::path::Path;

use hamlet_core::{HamletError, Result};
use tera::{Context, Tera};
use tracing::debug;

pub const INDEX_VIEW: &str = "views/index.html.haml";
pub const SHOW_VIEW: &str = "views/show.html.haml";
pub const NEW_VIEW: &str = "views/new.html.haml";
pub const EDIT_VIEW: &str = "views/edit.html.haml";
pub const LIST_VIEW: &str = "views/_list.html.haml";
pub const TABLE_PARTIAL: &str = "views/table.html.haml";
pub const LAYOUT: &str = "views/layout.html.haml";
pub const CONTROLLER_PREFIX: &str = "controllers/controller_";
pub const FORM_PREFIX: &str = "views/_form_";
pub const MODEL: &str = "model.rb";
pub const HELPER: &str = "helper.rb";
pub const HELPER_TEST: &str = "helper_test.rb";
pub const FUNCTIONAL_TEST: &str = "functional_test.rb";
pub const UNIT_TEST: &str = "unit_test.rb";
pub const FIXTURES: &str = "fixtures.yml";
pub const MIGRATION: &str = "migration.rb";
pub const STYLESHEET: &str = "stylesheet.css";

/// Wraps tera with the scaffold templates registered by id
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())
            .map_err(template_error)?;
        Ok(Self { tera })
    }

    /// Built-in templates, with any file under `dir` named like a template id
    /// taking its place.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut engine = Self::new()?;
        if !dir.is_dir() {
            return Ok(engine);
        }

        for (id, _) in BUILTIN_TEMPLATES {
            let path = dir.join(id);
            if path.is_file() {
                debug!(template = id, path = %path.display(), "using template override");
                let content = fs::read_to_string(&path)?;
                engine
                    .tera
                    .add_raw_template(id, &content)
                    .map_err(template_error)?;
            }
        }
        Ok(engine)
    }

    pub fn has_template(&self, id: &str) -> bool {
        self.tera.get_template_names().any(|name| name == id)
    }

    pub fn render(&self, id: &str, context: &Context) -> Result<String> {
        debug!(template = id, "rendering template");
        self.tera.render(id, context).map_err(template_error)
    }
}

/// tera keeps the useful part of a failure in the source chain.
pub(crate) fn template_error(error: tera::Error) -> HamletError {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    HamletError::template(message)
}

const BUILTIN_TEMPLATES: [(&str, &str); 19] = [
    (INDEX_VIEW, INDEX_TEMPLATE),
    (SHOW_VIEW, SHOW_TEMPLATE),
    (NEW_VIEW, NEW_TEMPLATE),
    (EDIT_VIEW, EDIT_TEMPLATE),
    (LIST_VIEW, LIST_TEMPLATE),
    (TABLE_PARTIAL, TABLE_TEMPLATE),
    ("views/_form_regular.html.haml", FORM_REGULAR_TEMPLATE),
    ("views/_form_formtastic.html.haml", FORM_FORMTASTIC_TEMPLATE),
    (LAYOUT, LAYOUT_TEMPLATE),
    ("controllers/controller_regular.rb", CONTROLLER_REGULAR_TEMPLATE),
    ("controllers/controller_inherited_resources.rb", CONTROLLER_INHERITED_RESOURCES_TEMPLATE),
    (MODEL, MODEL_TEMPLATE),
    (HELPER, HELPER_TEMPLATE),
    (HELPER_TEST, HELPER_TEST_TEMPLATE),
    (FUNCTIONAL_TEST, FUNCTIONAL_TEST_TEMPLATE),
    (UNIT_TEST, UNIT_TEST_TEMPLATE),
    (FIXTURES, FIXTURES_TEMPLATE),
    (MIGRATION, MIGRATION_TEMPLATE),
    (STYLESHEET, STYLESHEET_TEMPLATE),
];

pub const INDEX_TEMPLATE: &str = r#"%h1 Listing {{ resource.human_plural }}

{% if options.profile == "simple" -%}
{% include "views/table.html.haml" %}
{%- else -%}
= render :partial => 'list'
{%- endif %}

%br

= link_to 'New {{ resource.human }}', new_{{ resource.singular }}_path
"#;

pub const LIST_TEMPLATE: &str = r#"{% include "views/table.html.haml" %}
"#;

pub const TABLE_TEMPLATE: &str = r#"%table
  %tr
{%- for attribute in attributes %}
    %th {{ attribute.human_name }}
{%- endfor %}
    %th
    %th
    %th
{%- if options.has_position %}
    %th
    %th
{%- endif %}

  - @{{ resource.plural }}.each do |{{ resource.singular }}|
    %tr{:class => cycle('odd', 'even')}
{%- for attribute in attributes %}
      %td= h({{ resource.singular }}.{{ attribute.name }})
{%- endfor %}
      %td= link_to 'Show', {{ resource.singular }}
      %td= link_to 'Edit', edit_{{ resource.singular }}_path({{ resource.singular }})
      %td= link_to 'Destroy', {{ resource.singular }}, :confirm => 'Are you sure?', :method => :delete
{%- if options.has_position %}
      %td= link_to 'Up', move_higher_{{ resource.singular }}_path({{ resource.singular }}), :method => :put
      %td= link_to 'Down', move_lower_{{ resource.singular }}_path({{ resource.singular }}), :method => :put
{%- endif %}"#;

pub const SHOW_TEMPLATE: &str = r#"{% for attribute in attributes -%}
%p
  %b {{ attribute.human_name }}:
  = h(@{{ resource.singular }}.{{ attribute.name }})

{% endfor -%}
= link_to 'Edit', edit_{{ resource.singular }}_path(@{{ resource.singular }})
|
= link_to 'Back', {{ resource.plural }}_path
"#;

pub const NEW_TEMPLATE: &str = r#"%h1 New {{ resource.human }}

= render :partial => 'form'

= link_to 'Back', {{ resource.plural }}_path
"#;

pub const EDIT_TEMPLATE: &str = r#"%h1 Editing {{ resource.human }}

= render :partial => 'form'

= link_to 'Show', @{{ resource.singular }}
|
= link_to 'Back', {{ resource.plural }}_path
"#;

pub const FORM_REGULAR_TEMPLATE: &str = r#"- form_for(@{{ resource.singular }}) do |f|
  = f.error_messages
{%- for attribute in attributes %}

  %p
    = f.label :{{ attribute.name }}
    %br
    = f.{{ attribute.field_type }} :{{ attribute.name }}
{%- endfor %}

  %p
    = f.submit 'Save'
"#;

pub const FORM_FORMTASTIC_TEMPLATE: &str = r#"- semantic_form_for(@{{ resource.singular }}) do |form|
  - form.inputs do
{%- for attribute in attributes %}
    = form.input :{% if attribute.association %}{{ attribute.association }}{% else %}{{ attribute.name }}{% endif %}
{%- endfor %}
  - form.buttons do
    = form.commit_button
"#;

pub const LAYOUT_TEMPLATE: &str = r#"!!! Strict
%html{:xmlns => "http://www.w3.org/1999/xhtml", 'xml:lang' => "en", :lang => "en"}
  %head
    %meta{'http-equiv' => 'content-type', :content => 'text/html;charset=UTF-8'}
    %title= "{{ naming.application_name }}: #{controller.action_name}"
    = stylesheet_link_tag 'scaffold'
  %body
    %p{:style => "color: green"}= flash[:notice]
    = yield
"#;

pub const CONTROLLER_REGULAR_TEMPLATE: &str = r#"class {{ naming.controller.class_name }}Controller < ApplicationController
  # GET /{{ resource.plural }}
  def index
    @{{ resource.plural }} = {{ resource.model }}.all
  end

  # GET /{{ resource.plural }}/1
  def show
    @{{ resource.singular }} = {{ resource.model }}.find(params[:id])
  end

  # GET /{{ resource.plural }}/new
  def new
    @{{ resource.singular }} = {{ resource.model }}.new
  end

  # GET /{{ resource.plural }}/1/edit
  def edit
    @{{ resource.singular }} = {{ resource.model }}.find(params[:id])
  end

  # POST /{{ resource.plural }}
  def create
    @{{ resource.singular }} = {{ resource.model }}.new(params[:{{ resource.param_key }}])

    if @{{ resource.singular }}.save
      flash[:notice] = '{{ resource.human }} was successfully created.'
      redirect_to(@{{ resource.singular }})
    else
      render :action => "new"
    end
  end

  # PUT /{{ resource.plural }}/1
  def update
    @{{ resource.singular }} = {{ resource.model }}.find(params[:id])

    if @{{ resource.singular }}.update_attributes(params[:{{ resource.param_key }}])
      flash[:notice] = '{{ resource.human }} was successfully updated.'
      redirect_to(@{{ resource.singular }})
    else
      render :action => "edit"
    end
  end

  # DELETE /{{ resource.plural }}/1
  def destroy
    @{{ resource.singular }} = {{ resource.model }}.find(params[:id])
    @{{ resource.singular }}.destroy

    redirect_to({{ resource.plural }}_url)
  end
{%- if options.has_position %}

  # PUT /{{ resource.plural }}/1/move_higher
  def move_higher
    @{{ resource.singular }} = {{ resource.model }}.find(params[:id])
    @{{ resource.singular }}.move_higher

    redirect_to({{ resource.plural }}_url)
  end

  # PUT /{{ resource.plural }}/1/move_lower
  def move_lower
    @{{ resource.singular }} = {{ resource.model }}.find(params[:id])
    @{{ resource.singular }}.move_lower

    redirect_to({{ resource.plural }}_url)
  end
{%- endif %}
end
"#;

pub const CONTROLLER_INHERITED_RESOURCES_TEMPLATE: &str = r#"class {{ naming.controller.class_name }}Controller < InheritedResources::Base
  defaults :resource_class => {{ resource.model }}
  actions :all
{%- if options.has_position %}

  # PUT /{{ resource.plural }}/1/move_higher
  def move_higher
    resource.move_higher
    redirect_to collection_url
  end

  # PUT /{{ resource.plural }}/1/move_lower
  def move_lower
    resource.move_lower
    redirect_to collection_url
  end
{%- endif %}
end
"#;

pub const MODEL_TEMPLATE: &str = r#"class {{ naming.class_name }} < ActiveRecord::Base
{%- for attribute in attributes | sort(attribute="name") %}
{%- if attribute.association %}
  belongs_to :{{ attribute.association }}
{%- endif %}
{%- endfor %}
{%- if options.has_position %}

  acts_as_list
{%- endif %}
end
"#;

pub const HELPER_TEMPLATE: &str = r#"module {{ naming.controller.class_name }}Helper
end
"#;

pub const HELPER_TEST_TEMPLATE: &str = r#"require 'test_helper'

class {{ naming.controller.class_name }}HelperTest < ActionView::TestCase
end
"#;

pub const FUNCTIONAL_TEST_TEMPLATE: &str = r#"require 'test_helper'

class {{ naming.controller.class_name }}ControllerTest < ActionController::TestCase
  test "should get index" do
    get :index
    assert_response :success
    assert_not_nil assigns(:{{ resource.plural }})
  end

  test "should get new" do
    get :new
    assert_response :success
  end

  test "should create {{ resource.singular }}" do
    assert_difference('{{ resource.model }}.count') do
      post :create, :{{ resource.param_key }} => { }
    end

    assert_redirected_to {{ resource.singular }}_path(assigns(:{{ resource.singular }}))
  end

  test "should show {{ resource.singular }}" do
    get :show, :id => {{ naming.table_name }}(:one).to_param
    assert_response :success
  end

  test "should get edit" do
    get :edit, :id => {{ naming.table_name }}(:one).to_param
    assert_response :success
  end

  test "should update {{ resource.singular }}" do
    put :update, :id => {{ naming.table_name }}(:one).to_param, :{{ resource.param_key }} => { }
    assert_redirected_to {{ resource.singular }}_path(assigns(:{{ resource.singular }}))
  end

  test "should destroy {{ resource.singular }}" do
    assert_difference('{{ resource.model }}.count', -1) do
      delete :destroy, :id => {{ naming.table_name }}(:one).to_param
    end

    assert_redirected_to {{ resource.plural }}_path
  end
{%- if options.has_position %}

  test "should move {{ resource.singular }} higher" do
    put :move_higher, :id => {{ naming.table_name }}(:one).to_param
    assert_redirected_to {{ resource.plural }}_path
  end

  test "should move {{ resource.singular }} lower" do
    put :move_lower, :id => {{ naming.table_name }}(:one).to_param
    assert_redirected_to {{ resource.plural }}_path
  end
{%- endif %}
end
"#;

pub const UNIT_TEST_TEMPLATE: &str = r#"require 'test_helper'

class {{ naming.class_name }}Test < ActiveSupport::TestCase
  # Replace this with your real tests.
  test "the truth" do
    assert true
  end
end
"#;

pub const FIXTURES_TEMPLATE: &str = r#"# Read about fixtures at http://ar.rubyonrails.org/classes/Fixtures.html

one:
{%- for attribute in all_attributes %}
  {{ attribute.name }}: {{ attribute.default }}
{%- endfor %}

two:
{%- for attribute in all_attributes %}
  {{ attribute.name }}: {{ attribute.default }}
{%- endfor %}
"#;

pub const MIGRATION_TEMPLATE: &str = r#"class {{ migration_name }} < ActiveRecord::Migration
  def self.up
    create_table :{{ naming.table_name }} do |t|
{%- for attribute in all_attributes %}
      t.{{ attribute.column_type }} :{{ attribute.name }}
{%- endfor %}
{%- if not options.skip_timestamps %}

      t.timestamps
{%- endif %}
    end
  end

  def self.down
    drop_table :{{ naming.table_name }}
  end
end
"#;

pub const STYLESHEET_TEMPLATE: &str = r#"body { background-color: #fff; color: #333; }

body, p, ol, ul, td {
  font-family: verdana, arial, helvetica, sans-serif;
  font-size:   13px;
  line-height: 18px;
}

pre {
  background-color: #eee;
  padding: 10px;
  font-size: 11px;
}

a { color: #000; }
a:visited { color: #666; }
a:hover { color: #fff; background-color: #000; }

tr.odd { background-color: #fff; }
tr.even { background-color: #eee; }

.fieldWithErrors {
  padding: 2px;
  background-color: red;
  display: table;
}

#errorExplanation {
  width: 400px;
  border: 2px solid red;
  padding: 7px;
  padding-bottom: 12px;
  margin-bottom: 20px;
  background-color: #f0f0f0;
}

#errorExplanation h2 {
  text-align: left;
  font-weight: bold;
  padding: 5px 5px 5px 15px;
  font-size: 12px;
  margin: -7px;
  background-color: #c00;
  color: #fff;
}

#errorExplanation p {
  color: #333;
  margin-bottom: 0;
  padding: 5px;
}

#errorExplanation ul li {
  font-size: 12px;
  list-style: square;
}
"#;
